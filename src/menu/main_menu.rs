use crate::config::save::save_settings;
use crate::config::types::{Config, Language};
use crate::menu::handlers::run_contact_sheet_generator;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 可選的網格配置（欄, 列）
const GRID_PRESETS: [(usize, usize); 4] = [(12, 3), (9, 6), (6, 6), (4, 4)];

pub fn print_goodbye() {
    println!("\n{}", style(t!("main_menu.goodbye")).green().bold());
}

pub fn print_error(error: &anyhow::Error) {
    eprintln!("{} {error:#}", style(t!("main_menu.error_prefix")).red().bold());
}

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_generate"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_contact_sheet_generator(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(2) | None => Ok(false),
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_grid"),
            t!("settings.opt_timeout"),
            t!("settings.opt_skip_existing"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_grid_menu(term, config)?,
            Some(1) => show_timeout_menu(config)?,
            Some(2) => show_skip_existing_menu(config)?,
            Some(3) => show_language_menu(term, config)?,
            Some(4) | None => break,
            _ => unreachable!(),
        }
    }

    Ok(())
}

fn show_grid_menu(term: &Term, config: &mut Config) -> Result<()> {
    let sheet = &config.settings.contact_sheet;
    println!(
        "\n{} {}x{}",
        style(t!("settings.grid.current")).dim(),
        sheet.cols,
        sheet.rows
    );

    let items: Vec<String> = GRID_PRESETS
        .iter()
        .map(|(cols, rows)| format!("{cols} x {rows} ({})", cols * rows))
        .collect();

    let default_index = GRID_PRESETS
        .iter()
        .position(|&(cols, rows)| cols == sheet.cols && rows == sheet.rows)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.grid.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let (cols, rows) = GRID_PRESETS[selection];
    config.settings.contact_sheet.cols = cols;
    config.settings.contact_sheet.rows = rows;
    save_and_confirm(config, &format!("{cols}x{rows}"))
}

fn show_timeout_menu(config: &mut Config) -> Result<()> {
    let timeout: u64 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.timeout.prompt"))
        .default(config.settings.contact_sheet.tool_timeout_secs)
        .validate_with(|value: &u64| {
            if *value == 0 {
                Err(t!("settings.timeout.invalid").to_string())
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    config.settings.contact_sheet.tool_timeout_secs = timeout;
    save_and_confirm(config, &format!("{timeout}s"))
}

fn show_skip_existing_menu(config: &mut Config) -> Result<()> {
    let skip_existing = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.skip_existing.prompt"))
        .default(config.settings.contact_sheet.skip_existing)
        .interact()?;

    config.settings.contact_sheet.skip_existing = skip_existing;
    save_and_confirm(config, &skip_existing.to_string())
}

fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    let languages = [Language::English, Language::TraditionalChinese];
    let items: Vec<String> = languages.iter().map(ToString::to_string).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let language = languages[selection];
    config.settings.language = language;
    rust_i18n::set_locale(language.as_str());
    save_and_confirm(config, &language.to_string())
}

fn save_and_confirm(config: &Config, value: &str) -> Result<()> {
    save_settings(&config.settings)?;
    println!("\n{} {}", style(t!("settings.saved")).green(), value);
    std::thread::sleep(std::time::Duration::from_secs(1));
    Ok(())
}
