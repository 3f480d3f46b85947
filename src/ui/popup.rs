use crate::ui::style::PopupStyle;
use egui::{Align2, Painter, Pos2, Rect, Ui, Vec2};

/// Draws a two-line popup (bold-ish title, body) whose bottom edge sits just
/// above `anchor`. Returns the area it covered.
pub fn draw_popup(
    ui: &Ui,
    painter: &Painter,
    anchor: Pos2,
    title: &str,
    body: &str,
    style: &PopupStyle,
) -> Rect {
    let title_size = ui
        .fonts(|f| f.layout_no_wrap(title.to_string(), style.title_font.clone(), style.text_color))
        .size();
    let body_size = ui
        .fonts(|f| f.layout_no_wrap(body.to_string(), style.body_font.clone(), style.text_color))
        .size();

    let size = Vec2::new(
        title_size.x.max(body_size.x) + style.padding * 2.0,
        title_size.y + body_size.y + style.padding * 2.0 + 2.0,
    );
    let rect = Rect::from_min_size(
        Pos2::new(anchor.x - size.x / 2.0, anchor.y - size.y - 12.0),
        size,
    );

    painter.rect_filled(rect, style.rounding, style.background_color);
    painter.rect_stroke(rect, style.rounding, style.border_stroke);

    // Small pointer towards the marker
    painter.line_segment(
        [Pos2::new(rect.center().x, rect.max.y), Pos2::new(anchor.x, anchor.y - 4.0)],
        style.border_stroke,
    );

    let text_min = rect.min + Vec2::splat(style.padding);
    painter.text(
        text_min,
        Align2::LEFT_TOP,
        title,
        style.title_font.clone(),
        style.text_color,
    );
    painter.text(
        text_min + Vec2::new(0.0, title_size.y + 2.0),
        Align2::LEFT_TOP,
        body,
        style.body_font.clone(),
        style.text_color,
    );

    rect
}
