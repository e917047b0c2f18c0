use crate::component::contact_sheet_generator::{
    BatchPaths, BatchReport, ContactSheetGenerator, FfmpegTools, VideoOutcome,
};
use crate::config::Config;
use crate::config::save::{remember_folders, save_settings};
use crate::pause;
use crate::tools::{normalize_input_path, validate_directory_exists};
use anyhow::Result;
use console::{Term, style};
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn run_contact_sheet_generator(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    if let Err(e) = generate(shutdown_signal, config) {
        eprintln!("{} {:#}", style(t!("main_menu.error_prefix")).red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

fn generate(shutdown_signal: &Arc<AtomicBool>, config: &mut Config) -> Result<()> {
    println!("{}", style(t!("generator.title")).cyan().bold());

    let source_dir = prompt_folder(
        t!("generator.prompt_source").to_string(),
        config.settings.last_source_dir.as_deref(),
    )?;
    validate_directory_exists(&source_dir)?;

    let temp_dir = prompt_folder(
        t!("generator.prompt_temp").to_string(),
        config.settings.last_temp_dir.as_deref(),
    )?;
    let output_dir = prompt_folder(
        t!("generator.prompt_output").to_string(),
        config.settings.last_output_dir.as_deref(),
    )?;

    remember_folders(&mut config.settings, &source_dir, &temp_dir, &output_dir);
    if let Err(e) = save_settings(&config.settings) {
        warn!("無法儲存設定: {e:#}");
    }

    let sheet_settings = &config.settings.contact_sheet;
    let tools = FfmpegTools::new(&sheet_settings.montage_command, sheet_settings.tool_timeout());

    // 前一次批次留下的中斷狀態不影響這次
    shutdown_signal.store(false, Ordering::SeqCst);
    let generator = ContactSheetGenerator::new(tools, sheet_settings, Arc::clone(shutdown_signal));

    let paths = BatchPaths {
        source_dir,
        temp_dir,
        output_dir,
    };

    let progress_bar = ProgressBar::new(100);
    progress_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}",
        )?
        .progress_chars("#>-"),
    );
    progress_bar.set_message(t!("generator.starting").to_string());

    let result = generator.run(&paths, |percent, label| {
        progress_bar.set_position(percent.round().clamp(0.0, 100.0) as u64);
        progress_bar.set_message(label.to_string());
    });

    progress_bar.finish_and_clear();

    let report = result?;
    print_summary(&report);

    Ok(())
}

fn prompt_folder(prompt: String, last_used: Option<&Path>) -> Result<PathBuf> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt);
    if let Some(last_used) = last_used {
        input = input.default(last_used.display().to_string());
    }

    let path: String = input.interact_text()?;
    Ok(normalize_input_path(&path))
}

fn print_summary(report: &BatchReport) {
    println!();
    println!("{}", style(t!("generator.summary_title")).cyan().bold());
    println!(
        "  {}",
        t!("generator.summary_total", count = report.total_videos())
    );
    println!(
        "  {}",
        style(t!("generator.summary_success", count = report.successful())).green()
    );

    if report.skipped() > 0 {
        println!(
            "  {}",
            style(t!("generator.summary_skipped", count = report.skipped())).yellow()
        );
    }

    if report.failed() > 0 {
        println!(
            "  {}",
            style(t!("generator.summary_failed", count = report.failed())).red()
        );
    }

    for video in &report.videos {
        match &video.outcome {
            VideoOutcome::Skipped(e) | VideoOutcome::Failed(e) => {
                println!("    {} {}: {}", style("✗").red(), video.video.display_name, e);
            }
            VideoOutcome::Completed(_) | VideoOutcome::AlreadyExists(_) => {}
        }
    }

    if report.cancelled {
        println!("  {}", style(t!("generator.cancelled")).yellow());
    }
}
