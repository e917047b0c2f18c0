use anyhow::Result;
use console::Term;
use log::{info, warn};
use video_contact_sheet::config::Config;
use video_contact_sheet::init;
use video_contact_sheet::menu::{print_error, print_goodbye, show_main_menu};
use video_contact_sheet::signal::setup_shutdown_signal;

fn main() -> Result<()> {
    init::init();
    let term = Term::stdout();
    let shutdown_signal = setup_shutdown_signal()?;

    // 載入設定並套用語言
    let mut config = Config::new();
    rust_i18n::set_locale(config.settings.language.as_str());

    loop {
        match show_main_menu(&term, &shutdown_signal, &mut config) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                print_goodbye();
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e}");
                print_error(&e);
                break;
            }
        }
    }

    Ok(())
}
