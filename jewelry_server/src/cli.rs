use std::{env, env::VarError};

/// The server takes no arguments. Any argument prints the help text and the current configuration.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Secrets (JSB_JWT_SECRET, JSB_PAYME_SELLER_ID, JSB_MAILER_API_KEY) are never printed
    const DISPLAY_ENVS: [&str; 17] = [
        "RUST_LOG",
        "JSB_HOST",
        "JSB_PORT",
        "JSB_DATABASE_URL",
        "JSB_CURRENCY",
        "JSB_UNPRICED_ITEMS",
        "JSB_GATEWAY_TIMEOUT",
        "JSB_EVENT_BUFFER_SIZE",
        "JSB_PAYME_ENDPOINT",
        "JSB_PAYME_CALLBACK_URL",
        "JSB_PAYME_RETURN_URL",
        "JSB_PAYME_LANGUAGE",
        "JSB_SUPPORT_NAME",
        "JSB_SUPPORT_EMAIL",
        "JSB_SENDER_NAME",
        "JSB_SENDER_EMAIL",
        "JSB_MAILER_URL",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
