//! Add/edit band modal
//!
//! Field text is kept as typed; it is parsed and validated only on submit.
//! A rejected submit keeps the modal open and shows the validation message.

use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Alignment, Color, Element, Length};
use strata_core::validate::{check_name, parse_depth};
use strata_core::{BandId, BandRecord, Command, ValidationError};

use super::app::Message;

/// Which record the form is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Add,
    Edit(BandId),
}

/// Editable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Formation,
    Group,
    Top,
    Bottom,
}

/// Draft values of the modal
#[derive(Debug, Clone, PartialEq)]
pub struct BandForm {
    pub kind: FormKind,
    pub formation: String,
    pub group: String,
    pub top: String,
    pub bottom: String,
    /// Message of the last rejected submit
    pub error: Option<String>,
}

impl BandForm {
    /// Empty add form, optionally pre-filled with a group
    pub fn add(group: Option<&str>) -> Self {
        Self {
            kind: FormKind::Add,
            formation: String::new(),
            group: group.unwrap_or_default().to_string(),
            top: String::new(),
            bottom: String::new(),
            error: None,
        }
    }

    /// Edit form filled from a band
    pub fn edit(band: &BandRecord) -> Self {
        Self {
            kind: FormKind::Edit(band.id),
            formation: band.formation_name.clone(),
            group: band.group_name.clone(),
            top: band.top.display(),
            bottom: band.bottom.display(),
            error: None,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Formation => self.formation = value,
            FormField::Group => self.group = value,
            FormField::Top => self.top = value,
            FormField::Bottom => self.bottom = value,
        }
        self.error = None;
    }

    /// Parse the fields into the editor command
    ///
    /// Interval ordering and duplicate checks happen in the store.
    pub fn to_command(&self) -> Result<Command, ValidationError> {
        let top = parse_depth("Top", &self.top)?;
        let bottom = parse_depth("Bottom", &self.bottom)?;
        check_name(&self.group, ValidationError::EmptyGroup)?;
        match self.kind {
            FormKind::Add => {
                check_name(&self.formation, ValidationError::EmptyFormation)?;
                Ok(Command::AddBand(BandRecord::new(
                    self.formation.trim(),
                    self.group.trim(),
                    top,
                    bottom,
                )))
            }
            FormKind::Edit(id) => Ok(Command::UpdateBand {
                id,
                top,
                bottom,
                group: self.group.trim().to_string(),
            }),
        }
    }
}

/// Render the modal content
pub fn view(form: &BandForm) -> Element<'_, Message> {
    let title = match form.kind {
        FormKind::Add => "Add band",
        FormKind::Edit(_) => "Edit band",
    };
    let close_btn = button(text("×").size(20))
        .on_press(Message::CloseForm)
        .style(button::secondary);
    let header = row![text(title).size(22), Space::new().width(Length::Fill), close_btn]
        .align_y(Alignment::Center)
        .width(Length::Fill);

    // Formation name is fixed once a band exists
    let formation: Element<Message> = match form.kind {
        FormKind::Add => text_input("Formation name", &form.formation)
            .on_input(|v| Message::FormInput(FormField::Formation, v))
            .into(),
        FormKind::Edit(_) => text(&form.formation).size(14).into(),
    };

    let fields = column![
        labeled("Formation", formation),
        labeled(
            "Group",
            text_input("Group name", &form.group)
                .on_input(|v| Message::FormInput(FormField::Group, v))
                .into()
        ),
        labeled(
            "Top (0-1)",
            text_input("0.00", &form.top)
                .on_input(|v| Message::FormInput(FormField::Top, v))
                .on_submit(Message::SubmitForm)
                .into()
        ),
        labeled(
            "Bottom (0-1)",
            text_input("1.00", &form.bottom)
                .on_input(|v| Message::FormInput(FormField::Bottom, v))
                .on_submit(Message::SubmitForm)
                .into()
        ),
    ]
    .spacing(10);

    let error: Element<Message> = match &form.error {
        Some(message) => text(message)
            .size(13)
            .color(Color::from_rgb(1.0, 0.45, 0.45))
            .into(),
        None => Space::new().height(Length::Fixed(18.0)).into(),
    };

    let actions = row![
        Space::new().width(Length::Fill),
        button(text("Cancel"))
            .on_press(Message::CloseForm)
            .style(button::secondary),
        button(text("Save"))
            .on_press(Message::SubmitForm)
            .style(button::primary),
    ]
    .spacing(10)
    .width(Length::Fill);

    container(
        column![header, fields, error, actions]
            .spacing(15)
            .width(Length::Fixed(420.0)),
    )
    .padding(30)
    .style(container::rounded_box)
    .into()
}

fn labeled<'a>(label: &'a str, input: Element<'a, Message>) -> Element<'a, Message> {
    row![text(label).size(14).width(Length::Fixed(110.0)), input]
        .spacing(10)
        .align_y(Alignment::Center)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(kind: FormKind, top: &str, bottom: &str) -> BandForm {
        BandForm {
            kind,
            formation: " F9 ".into(),
            group: "G1".into(),
            top: top.into(),
            bottom: bottom.into(),
            error: None,
        }
    }

    #[test]
    fn test_add_command() {
        let cmd = filled(FormKind::Add, "0.1", " 0.25").to_command().unwrap();
        assert_eq!(cmd, Command::AddBand(BandRecord::new("F9", "G1", 0.1, 0.25)));
    }

    #[test]
    fn test_edit_command() {
        let cmd = filled(FormKind::Edit(BandId(4)), "0.5", "0.5").to_command().unwrap();
        assert_eq!(
            cmd,
            Command::UpdateBand {
                id: BandId(4),
                top: 0.5,
                bottom: 0.5,
                group: "G1".into()
            }
        );
    }

    #[test]
    fn test_field_errors() {
        assert_eq!(
            filled(FormKind::Add, "abc", "0.5").to_command(),
            Err(ValidationError::NotNumeric { field: "Top" })
        );
        assert!(matches!(
            filled(FormKind::Add, "0.1", "1.2").to_command(),
            Err(ValidationError::OutOfRange { field: "Bottom", .. })
        ));
        let mut form = filled(FormKind::Add, "0.1", "0.2");
        form.formation = "  ".into();
        assert_eq!(form.to_command(), Err(ValidationError::EmptyFormation));
    }

    #[test]
    fn test_edit_prefill_and_input_clears_error() {
        let mut band = BandRecord::new("F1", "G1", 0.126, 0.5);
        band.id = BandId(2);
        let mut form = BandForm::edit(&band);
        assert_eq!(form.top, "0.13");
        assert_eq!(form.bottom, "0.50");

        form.error = Some("bad".into());
        form.set(FormField::Top, "0.2".into());
        assert_eq!(form.top, "0.2");
        assert!(form.error.is_none());
    }
}
