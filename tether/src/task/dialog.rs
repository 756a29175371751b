//! Progress and error display of a background task.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::TaskError;
use crate::model::{ListenerId, Model};
use crate::text::TextResource;
use crate::widgets::{Button, Label, Panel, ProgressBar, Widget};

/// Shows a task's description and percentage.
///
/// The percentage lives in a [`Model<u8>`] bound to a [`ProgressBar`]; the
/// dialog is only visible while a task runs.
#[derive(Debug, Clone)]
pub struct ProgressDialog {
    percentage: Model<u8>,
    bar: ProgressBar,
    heading: Label,
    title: Label,
    panel: Panel,
    listener: ListenerId,
}

impl ProgressDialog {
    pub fn new(heading: impl Into<String>, description: impl Into<String>) -> Self {
        let bar = ProgressBar::new();
        let heading = Label::new(heading);
        let title = Label::new(description);
        let panel = Panel::column([
            Widget::Label(heading.clone()),
            Widget::Label(title.clone()),
            Widget::ProgressBar(bar.clone()),
        ]);
        panel.set_visible(false);

        let percentage = Model::new(0u8);
        let target = bar.clone();
        let listener = percentage.add_listener(move |model| target.set_value(model.get()));
        Self {
            percentage,
            bar,
            heading,
            title,
            panel,
            listener,
        }
    }

    /// The percentage model.
    pub fn percentage(&self) -> &Model<u8> {
        &self.percentage
    }

    pub fn progress_bar(&self) -> &ProgressBar {
        &self.bar
    }

    /// Dialog heading, such as "Please wait".
    pub fn heading(&self) -> String {
        self.heading.text()
    }

    /// Description of the running task.
    pub fn title(&self) -> String {
        self.title.text()
    }

    pub fn widget(&self) -> Widget {
        Widget::Panel(self.panel.clone())
    }

    pub fn is_visible(&self) -> bool {
        self.panel.is_visible()
    }

    pub(crate) fn show(&self) {
        self.percentage.set(0);
        self.panel.set_visible(true);
    }

    pub(crate) fn update(&self, percent: u8) {
        self.percentage.set(percent.min(100));
    }

    pub(crate) fn hide(&self) {
        self.panel.set_visible(false);
    }

    /// Detach the bar from the percentage model.
    pub(crate) fn unbind(&self) {
        self.percentage.remove_listener(self.listener);
    }
}

/// Tells the user that a task failed.
///
/// Shows a localized message and a button that reveals or hides the
/// technical detail.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    message: Label,
    detail: Label,
    details_button: Button,
    close_button: Button,
    panel: Panel,
    open: Arc<AtomicBool>,
}

impl ErrorReport {
    pub fn new(error: &TaskError, resource: &dyn TextResource) -> Self {
        let message = Label::new(
            resource.format_string("taskWithProgressDialog.failed", &[error.message().as_str()]),
        );
        let detail = Label::new(error.detail());
        detail.set_visible(false);

        let show = resource.string("taskWithProgressDialog.showDetails");
        let hide = resource.string("taskWithProgressDialog.hideDetails");
        let details_button = Button::new(show.clone());
        let close_button = Button::new(resource.string("gen.close"));
        let panel = Panel::column([
            Widget::Label(message.clone()),
            Widget::Label(detail.clone()),
            Widget::Panel(Panel::row([
                Widget::Button(details_button.clone()),
                Widget::Button(close_button.clone()),
            ])),
        ]);

        let shown = Arc::new((show, hide));
        let target = detail.clone();
        details_button.on_click(move |button| {
            let visible = !target.is_visible();
            target.set_visible(visible);
            button.set_label(if visible { &shown.1 } else { &shown.0 });
        });
        let open = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&open);
        close_button.on_click(move |_| flag.store(false, Ordering::SeqCst));

        Self {
            message,
            detail,
            details_button,
            close_button,
            panel,
            open,
        }
    }

    pub fn message(&self) -> String {
        self.message.text()
    }

    pub fn detail(&self) -> String {
        self.detail.text()
    }

    pub fn details_visible(&self) -> bool {
        self.detail.is_visible()
    }

    /// Reveal or hide the technical detail.
    pub fn toggle_details(&self) {
        self.details_button.click();
    }

    pub fn details_button(&self) -> &Button {
        &self.details_button
    }

    pub fn close_button(&self) -> &Button {
        &self.close_button
    }

    /// False once the close button was pressed.
    pub fn is_visible(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn widget(&self) -> Widget {
        Widget::Panel(self.panel.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextBundle;

    #[test]
    fn test_progress_drives_bar() {
        let dialog = ProgressDialog::new("Please wait", "Importing");
        dialog.show();
        dialog.update(40);
        assert_eq!(dialog.progress_bar().value(), 40);
        dialog.update(250);
        assert_eq!(dialog.progress_bar().value(), 100);
        dialog.unbind();
        dialog.update(10);
        assert_eq!(dialog.progress_bar().value(), 100);
    }

    #[test]
    fn test_error_report_details() {
        let bundle = TextBundle::english();
        let report = ErrorReport::new(&TaskError::Panicked("boom".to_string()), &bundle);
        assert_eq!(report.message(), "The operation failed: boom");
        assert!(!report.details_visible());

        report.toggle_details();
        assert!(report.details_visible());
        assert_eq!(report.details_button().label(), "Hide details");
        report.toggle_details();
        assert!(!report.details_visible());

        report.close_button().click();
        assert!(!report.is_visible());
    }
}
