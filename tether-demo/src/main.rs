mod form;
mod paths;

use std::fs::{self, File};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Datelike;
use simplelog::{Config, LevelFilter, WriteLogger};
use tether::prelude::*;

use form::{Registration, RegistrationView};

fn init_logging() {
    paths::rotate_logs();
    let path = paths::log_file();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(LevelFilter::Debug, Config::default(), file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file {}: {}", path.display(), e),
    }
}

fn print_result(resource: &dyn TextResource, result: &ValidationResult) {
    if result.is_valid() {
        println!("  form is valid");
        return;
    }
    for error in result.errors() {
        let messages: Vec<String> = error
            .error_ids
            .iter()
            .map(|id| resource.string(id))
            .collect();
        println!("  {}: {}", error.field_name, messages.join(" "));
    }
}

fn run(resource: Arc<TextBundle>) -> Result<(), Box<dyn std::error::Error>> {
    let factory = BeanFactory::new(resource.clone());
    let form = Registration::new();
    let validator = form.validator();
    let mut view = RegistrationView::new(&factory, &form)?;
    log::info!("Form built with {} widgets", view.widgets().len());

    println!("Validating the empty form:");
    print_result(resource.as_ref(), &validator.validate());
    println!("  name field says: {:?}", view.name.error_text());

    view.name.inner().field().type_text("Ada Lovelace");
    view.email.inner().field().type_text("ada.example.org");
    view.age.inner().field().type_text("208");
    view.country.inner().list_box().key_typed('w');

    println!("Validating after typing:");
    print_result(resource.as_ref(), &validator.validate());

    view.email.inner().field().set_text("ada@example.org");
    view.age.inner().field().set_text("36");

    if let Some(birthday) = form::scripted_birthday() {
        let calendar = view.birthday.inner().open_calendar();
        calendar.set_year(birthday.year());
        calendar.set_month(birthday.month());
        calendar.select_day(birthday.day());
        calendar.confirm();
    }
    view.attachment.inner().choose_button().click();
    view.newsletter.inner().toggle().toggle();
    if let Some(phone) = view.contact.buttons().get(1) {
        phone.inner().toggle().toggle();
    }

    println!("Validating the completed form:");
    let result = validator.validate();
    print_result(resource.as_ref(), &result);
    if result.is_invalid() {
        view.close();
        return Err("the scripted form did not validate".into());
    }

    let mut task = TaskWithProgress::new("Submitting registration", resource.clone());
    let receipt = task.execute(|progress| {
        for percent in [25, 50, 75, 100] {
            thread::sleep(Duration::from_millis(20));
            progress.on_progress_update(percent);
        }
        Ok::<_, String>(format!(
            "{} <{}>",
            form.name.get().unwrap_or_default(),
            form.email.get().unwrap_or_default()
        ))
    });
    task.close();

    match receipt {
        Ok(receipt) => println!("Submitted {receipt}"),
        Err(e) => println!("Submission failed: {}", e.message()),
    }
    println!("  birthday:   {}", view.birthday.inner().field().text());
    if let Some(country) = form.country.selected_item() {
        println!("  country:    {country}");
    }
    println!("  attachment: {}", view.attachment.inner().field().text());
    println!("  newsletter: {}", form.newsletter.get());
    println!(
        "  contact:    {}",
        if form.contact_by_phone.get() { "phone" } else { "e-mail" }
    );

    view.close();
    log::info!("Form closed");
    Ok(())
}

fn main() {
    init_logging();

    let resource = Arc::new(
        TextBundle::english()
            .with("demo.newsletter", "Send me the newsletter")
            .with("demo.ageOutOfRange", "Age must be between 0 and 150.")
            .with("demo.contactByEmail", "Contact me by e-mail")
            .with("demo.contactByPhone", "Contact me by phone"),
    );

    if let Err(e) = run(resource) {
        log::error!("Demo failed: {}", e);
        eprintln!("Error: {}", e);
    }
}
