//! Standalone SVG snapshot of a scene

use std::fmt::Write;

use super::{Anchor, Node, Scene, Stroke};
use crate::config::LayoutConfig;

/// Serialize the scene to an SVG document
pub fn to_svg(scene: &Scene, config: &LayoutConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = fmt_num(scene.width),
        h = fmt_num(scene.height)
    );
    for node in scene.nodes(config) {
        write_node(&mut out, &node);
    }
    out.push_str("</svg>\n");
    out
}

fn write_node(out: &mut String, node: &Node) {
    let _ = match node {
        Node::Rect {
            x,
            y,
            width,
            height,
            fill,
            opacity,
            stroke,
        } => writeln!(
            out,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="{}"{}/>"#,
            fmt_num(*x),
            fmt_num(*y),
            fmt_num(*width),
            fmt_num(*height),
            fill,
            fmt_num(*opacity),
            stroke_attrs(stroke.as_ref())
        ),
        Node::Line { from, to, stroke } => writeln!(
            out,
            r#"  <line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            fmt_num(from.0),
            fmt_num(from.1),
            fmt_num(to.0),
            fmt_num(to.1),
            stroke_attrs(Some(stroke))
        ),
        Node::Text {
            x,
            y,
            content,
            size,
            color,
            opacity,
            anchor,
        } => writeln!(
            out,
            r#"  <text x="{}" y="{}" font-size="{}" fill="{}" fill-opacity="{}" text-anchor="{}" dominant-baseline="middle">{}</text>"#,
            fmt_num(*x),
            fmt_num(*y),
            fmt_num(*size),
            color,
            fmt_num(*opacity),
            anchor_attr(*anchor),
            escape(content)
        ),
    };
}

fn stroke_attrs(stroke: Option<&Stroke>) -> String {
    let Some(stroke) = stroke else {
        return String::new();
    };
    let mut attrs = format!(
        r#" stroke="{}" stroke-width="{}""#,
        stroke.color,
        fmt_num(stroke.width)
    );
    if let Some([on, off]) = stroke.dash {
        let _ = write!(attrs, r#" stroke-dasharray="{},{}""#, fmt_num(on), fmt_num(off));
    }
    attrs
}

fn anchor_attr(anchor: Anchor) -> &'static str {
    match anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
        Anchor::End => "end",
    }
}

/// Two decimals, trailing zeros trimmed
fn fmt_num(v: f32) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
