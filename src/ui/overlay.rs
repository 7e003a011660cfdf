/// Annotation overlay
///
/// Renders the editable fields, their toggles and the live filename
/// preview on top of the image. Pure view code: every transition happens
/// in the editor, the overlay only displays its state.

use iced::widget::{column, container, text};
use iced::{Alignment, Element, Length};

use crate::state::editor::{Editor, Field};
use crate::state::entry::ChangeEntry;
use crate::Message;

/// Build the overlay for the current visit.
pub fn view(
    editor: &Editor,
    entry: &ChangeEntry,
    index: usize,
    count: usize,
    status: &str,
) -> Element<'static, Message> {
    let header = text(format!("{} ({}/{})", entry.original, index + 1, count)).size(20);

    let fields = column![
        field_line(editor, Field::Date, "Date", &editor.date_text, Some(editor.include_date)),
        field_line(editor, Field::Prefix, "Prefix", &editor.prefix, Some(editor.include_prefix)),
        field_line(editor, Field::Location, "Location", &editor.city, Some(editor.include_location)),
        field_line(editor, Field::Description, "Description", &editor.description, None),
    ]
    .spacing(4);

    let preview = if editor.delete {
        text(format!(
            "✖ marked for deletion (moved to {}/ when the script runs)",
            crate::batch::QUARANTINE_DIR
        ))
        .size(16)
    } else {
        text(format!("→ {}", editor.preview_name(&entry.extension()))).size(16)
    };

    let help = text(
        "[Tab] next field   [F1] location   [F2] prefix   [F3] date   \
         [Ctrl+R] reload   [Del] delete   [F4] overlay   [Enter] confirm   [Esc] finish",
    )
    .size(13);

    let mut panel = column![header, fields, preview, help]
        .spacing(10)
        .align_x(Alignment::Start);

    if !status.is_empty() {
        panel = panel.push(text(status.to_string()).size(13));
    }

    container(
        container(panel)
            .padding(16)
            .style(container::rounded_box),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .align_y(iced::alignment::Vertical::Bottom)
    .padding(20)
    .into()
}

/// One labelled field row: focus marker, toggle state, current value.
fn field_line(
    editor: &Editor,
    field: Field,
    label: &str,
    value: &str,
    toggle: Option<bool>,
) -> Element<'static, Message> {
    let marker = if editor.focus == field { "▶" } else { " " };
    let switch = match toggle {
        Some(true) => "[x]",
        Some(false) => "[ ]",
        // The description has no inclusion toggle.
        None => "   ",
    };

    text(format!("{} {} {}: {}", marker, switch, label, value))
        .size(16)
        .into()
}
