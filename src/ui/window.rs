use gtk4::prelude::*;
use libadwaita::prelude::*;

use crate::app::session::{ProcessingStatus, Session};
use crate::options::{HumanizeOptions, Tone};

/// Handles returned from building the main window.
pub struct WindowWidgets {
    pub window: libadwaita::ApplicationWindow,
    pub status_label: gtk4::Label,
    pub file_row: libadwaita::ActionRow,
    pub choose_button: gtk4::Button,
    pub tone_row: libadwaita::ComboRow,
    pub simplify_row: libadwaita::SwitchRow,
    pub flow_row: libadwaita::SwitchRow,
    pub audience_row: libadwaita::EntryRow,
    pub api_key_row: libadwaita::PasswordEntryRow,
    pub humanize_button: gtk4::Button,
    pub copy_button: gtk4::Button,
    pub reset_button: gtk4::Button,
    pub result_buffer: gtk4::TextBuffer,
}

/// Build the main window: controls on the left, streamed output on the
/// right.
pub fn build_window(
    app: &libadwaita::Application,
    initial_api_key: &str,
    defaults: &HumanizeOptions,
) -> WindowWidgets {
    let window = libadwaita::ApplicationWindow::builder()
        .application(app)
        .title("Humanize AI")
        .default_width(960)
        .default_height(640)
        .build();

    let toolbar_view = libadwaita::ToolbarView::new();
    let header = libadwaita::HeaderBar::new();

    let menu_button = gtk4::MenuButton::new();
    menu_button.set_icon_name("open-menu-symbolic");

    let menu = gtk4::gio::Menu::new();
    menu.append(Some("Quit"), Some("app.quit"));
    menu_button.set_menu_model(Some(&menu));
    header.pack_end(&menu_button);

    toolbar_view.add_top_bar(&header);

    let controls = gtk4::Box::new(gtk4::Orientation::Vertical, 12);
    controls.set_margin_start(16);
    controls.set_margin_end(16);
    controls.set_margin_top(12);
    controls.set_margin_bottom(12);
    controls.set_width_request(360);

    // --- Document group ---
    let document_group = libadwaita::PreferencesGroup::new();
    document_group.set_title("Document");

    let file_row = libadwaita::ActionRow::builder()
        .title("No document selected")
        .subtitle("Drop a file here or browse")
        .build();
    let choose_button = gtk4::Button::builder()
        .label("Browse\u{2026}")
        .valign(gtk4::Align::Center)
        .build();
    file_row.add_suffix(&choose_button);
    document_group.add(&file_row);

    controls.append(&document_group);

    // --- Humanization settings ---
    let settings_group = libadwaita::PreferencesGroup::new();
    settings_group.set_title("Humanization Settings");
    settings_group.set_description(Some("Customize how your document is rewritten"));

    let tone_row = libadwaita::ComboRow::builder()
        .title("Tone of Voice")
        .build();
    let tone_model = gtk4::StringList::new(&Tone::ALL.map(Tone::label));
    tone_row.set_model(Some(&tone_model));
    tone_row.set_selected(defaults.tone().index());
    settings_group.add(&tone_row);

    let simplify_row = libadwaita::SwitchRow::builder()
        .title("Simplify Complex Terms")
        .active(defaults.simplify_complex_terms())
        .build();
    settings_group.add(&simplify_row);

    let flow_row = libadwaita::SwitchRow::builder()
        .title("Improve Flow")
        .subtitle("Sentence variety and smoother transitions")
        .active(defaults.improve_flow())
        .build();
    settings_group.add(&flow_row);

    let audience_row = libadwaita::EntryRow::builder()
        .title("Target Audience")
        .build();
    settings_group.add(&audience_row);

    controls.append(&settings_group);

    // --- API key ---
    let api_group = libadwaita::PreferencesGroup::new();
    api_group.set_title("Gemini API");

    let api_key_row = libadwaita::PasswordEntryRow::builder()
        .title("API Key")
        .text(initial_api_key)
        .build();
    api_group.add(&api_key_row);

    controls.append(&api_group);

    // --- Actions ---
    let humanize_button = gtk4::Button::builder()
        .label("Humanize Document")
        .build();
    humanize_button.add_css_class("suggested-action");
    humanize_button.add_css_class("pill");
    controls.append(&humanize_button);

    let secondary_actions = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    secondary_actions.set_halign(gtk4::Align::Center);

    let copy_button = gtk4::Button::builder().label("Copy Text").build();
    secondary_actions.append(&copy_button);

    let reset_button = gtk4::Button::builder().label("Start Over").build();
    reset_button.add_css_class("destructive-action");
    secondary_actions.append(&reset_button);

    controls.append(&secondary_actions);

    // --- Status line ---
    let status_label = gtk4::Label::new(Some("Ready"));
    status_label.add_css_class("dim-label");
    status_label.set_wrap(true);
    status_label.set_margin_top(8);
    controls.append(&status_label);

    let controls_scroll = gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .child(&controls)
        .build();

    // --- Output pane ---
    let result_view = gtk4::TextView::builder()
        .editable(false)
        .wrap_mode(gtk4::WrapMode::Word)
        .left_margin(12)
        .right_margin(12)
        .top_margin(12)
        .bottom_margin(12)
        .build();
    let result_buffer = result_view.buffer();

    let result_scroll = gtk4::ScrolledWindow::builder()
        .child(&result_view)
        .hexpand(true)
        .vexpand(true)
        .build();

    let result_frame = gtk4::Frame::builder()
        .label("Humanized Output")
        .child(&result_scroll)
        .margin_end(16)
        .margin_top(12)
        .margin_bottom(12)
        .build();

    let content = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    content.append(&controls_scroll);
    content.append(&result_frame);

    toolbar_view.set_content(Some(&content));
    window.set_content(Some(&toolbar_view));

    WindowWidgets {
        window,
        status_label,
        file_row,
        choose_button,
        tone_row,
        simplify_row,
        flow_row,
        audience_row,
        api_key_row,
        humanize_button,
        copy_button,
        reset_button,
        result_buffer,
    }
}

/// Sync widget labels and sensitivity with the session. Called after
/// every state transition; stream increments bypass this and write the
/// result buffer directly.
pub fn refresh(widgets: &WindowWidgets, session: &Session, stream_in_flight: bool) {
    match session.file() {
        Some(file) => {
            widgets.file_row.set_title(&file.name);
            widgets.file_row.set_subtitle(&file.size_display());
        }
        None => {
            widgets.file_row.set_title("No document selected");
            widgets.file_row.set_subtitle("Drop a file here or browse");
        }
    }

    widgets.choose_button.set_sensitive(session.can_select_file());

    let editable = session.can_edit_options();
    widgets.tone_row.set_sensitive(editable);
    widgets.simplify_row.set_sensitive(editable);
    widgets.flow_row.set_sensitive(editable);
    widgets.audience_row.set_sensitive(editable);

    let processing = session.status() == ProcessingStatus::Processing;
    widgets
        .humanize_button
        .set_label(if processing { "Humanizing\u{2026}" } else { "Humanize Document" });
    widgets
        .humanize_button
        .set_sensitive(session.can_start() && !stream_in_flight);
    widgets.copy_button.set_sensitive(session.can_copy());

    widgets.status_label.set_text(match session.status() {
        ProcessingStatus::Idle => "Ready",
        ProcessingStatus::Uploading => "Reading document\u{2026}",
        ProcessingStatus::Processing => "Humanizing\u{2026}",
        ProcessingStatus::Complete => "Done \u{2014} review the rewrite",
        ProcessingStatus::Error => "Error",
    });
}
