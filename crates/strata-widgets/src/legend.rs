//! Formation legend
//!
//! One swatch + name per formation. Single click highlights the formation,
//! double click toggles exclusive visibility; both are raised as messages
//! carrying the formation name.

use iced::widget::{column, container, mouse_area, row, scrollable, text, Space};
use iced::{Border, Color, Element, Length};
use strata_core::LegendEntry;

use crate::theme::{to_color, LEGEND_ACTIVE_BORDER, LEGEND_TEXT, LEGEND_TEXT_MUTED};

const SWATCH_SIZE: f32 = 14.0;

/// Create the legend element
///
/// * `highlighted` / `exclusive` - formation currently emphasised, if any
/// * `on_click` / `on_double_click` - called with the formation name
pub fn legend_view<'a, Message>(
    entries: &[LegendEntry],
    highlighted: Option<&str>,
    exclusive: Option<&str>,
    on_click: impl Fn(String) -> Message + 'a,
    on_double_click: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let items = entries.iter().map(|entry| {
        let is_active = highlighted == Some(entry.formation.as_str())
            || exclusive == Some(entry.formation.as_str());
        let is_muted = exclusive.is_some_and(|name| name != entry.formation);
        legend_item(
            entry,
            is_active,
            is_muted,
            on_click(entry.formation.clone()),
            on_double_click(entry.formation.clone()),
        )
    });

    scrollable(column(items).spacing(4).padding(8))
        .height(Length::Fill)
        .into()
}

fn legend_item<'a, Message>(
    entry: &LegendEntry,
    is_active: bool,
    is_muted: bool,
    on_click: Message,
    on_double_click: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let fill = to_color(entry.color);
    let swatch = container(Space::new())
        .width(Length::Fixed(SWATCH_SIZE))
        .height(Length::Fixed(SWATCH_SIZE))
        .style(move |_| container::Style {
            background: Some(fill.into()),
            ..Default::default()
        });

    let label_color = if is_muted { LEGEND_TEXT_MUTED } else { LEGEND_TEXT };
    let content = container(
        row![swatch, text(entry.formation.clone()).size(12).color(label_color)]
            .spacing(6)
            .align_y(iced::Alignment::Center),
    )
    .padding([2, 6])
    .width(Length::Fill)
    .style(move |_| container::Style {
        border: Border {
            color: if is_active {
                LEGEND_ACTIVE_BORDER
            } else {
                Color::TRANSPARENT
            },
            width: 1.0,
            radius: 3.0.into(),
        },
        ..Default::default()
    });

    mouse_area(content)
        .on_press(on_click)
        .on_double_click(on_double_click)
        .into()
}
