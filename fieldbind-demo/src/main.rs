mod command;

use std::fs::File;
use std::sync::Arc;

use fieldbind::prelude::*;
use fieldbind::wakeup;
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::command::Command;

/// Print a field's error, or that it is fine.
fn print_field(form: &Form, name: &str) {
    let Some(field) = form.get(name) else {
        return;
    };
    match field.error().message() {
        Some(msg) => println!("  {name}: {msg}"),
        None => println!("  {name}: ok"),
    }
}

async fn run() -> std::io::Result<()> {
    let signup = Arc::new(SignupForm::spawn());
    let (tx, mut rx) = wakeup::channel();
    for name in signup.form().names() {
        if let Some(field) = signup.form().get(name) {
            field.set_wakeup(tx.clone());
        }
    }

    // Render validation results as the drivers produce them.
    let renderer = {
        let signup = Arc::clone(&signup);
        tokio::spawn(async move {
            while let Some(id) = rx.recv().await {
                let mut ids = rx.drain();
                ids.insert(0, id);
                for name in signup.form().names() {
                    if signup.form().get(name).is_some_and(|f| ids.contains(&f.id())) {
                        print_field(signup.form(), name);
                    }
                }
                if let Some(msg) = signup.confirm_error() {
                    println!("  password_confirm: {msg}");
                }
            }
        })
    };

    println!("Type field=value (first, last, email, password, confirm), show, submit, reset or quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Type { field, value } => {
                if let Some(field) = signup.form().get(field) {
                    field.bind().on_change(value);
                }
            }
            Command::Show => {
                for (name, value) in signup.form().values() {
                    println!("  {name} = {value:?}");
                    print_field(signup.form(), &name);
                }
            }
            Command::Submit => match signup.submit() {
                Ok(payload) => match payload.to_json() {
                    Ok(json) => println!("{json}"),
                    Err(e) => println!("{e}"),
                },
                Err(SubmitError::Invalid(issues)) => {
                    println!("Credentials are not valid!");
                    for issue in issues {
                        println!("  {}: {}", issue.field_name, issue.message);
                    }
                }
                Err(e) => println!("{e}"),
            },
            Command::Reset => {
                signup.reset();
                println!("Form reset");
            }
            Command::Quit => break,
        }
    }

    info!("demo: shutting down");
    signup.close();
    renderer.abort();
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Ok(log_file) = File::create("fieldbind-demo.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
    }
}
