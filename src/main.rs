use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shellmenu::{
    config,
    host::{
        headless::{HeadlessWindow, LoggingSignals, NoContent},
        HostServices, SystemOpener, WindowId,
    },
    menu::{self, Dispatcher, MenuNode, Submenu},
    platform::Platform,
};

#[derive(Parser, Debug)]
#[command(name = "shellmenu", version, about = "Desktop shell application menu")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints the menu that would be built for a platform.
    Print {
        /// Platform identifier: darwin, win32, linux or anything else. Defaults to the running OS.
        #[arg(long)]
        platform: Option<String>,
        /// Overrides the configured application display name.
        #[arg(long)]
        app_name: Option<String>,
        /// Emit JSON instead of an indented tree.
        #[arg(long)]
        json: bool,
    },
    /// Runs a menu item against a headless window, e.g. `activate "Help/Report Issues"`.
    /// Links open in the real browser; window calls and signals are only logged.
    Activate {
        /// Slash-separated label path.
        path: String,
        #[arg(long)]
        platform: Option<String>,
    },
    /// Prints the config path that would be used (if any).
    ConfigPath,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Print {
            platform,
            app_name,
            json,
        } => {
            let settings = config::load().context("load config")?;
            let platform = resolve_platform(platform.as_deref());
            let app_name = app_name.unwrap_or(settings.app_name);
            let built = menu::build(&platform, &app_name, WindowId(1));
            if json {
                let s = serde_json::to_string_pretty(&built.bar).context("serialize menu")?;
                println!("{s}");
            } else {
                for section in &built.bar.sections {
                    print_section(section, 0);
                }
            }
        }
        Command::Activate { path, platform } => {
            let settings = config::load().context("load config")?;
            let platform = resolve_platform(platform.as_deref());
            let window = HeadlessWindow::new(WindowId(1));
            let built = menu::build(&platform, &settings.app_name, window.id());

            let labels = path.split('/').map(str::trim).collect::<Vec<_>>();
            let node = built
                .bar
                .find_by_path(&labels)
                .ok_or_else(|| anyhow!("No menu item at '{path}' on {platform}"))?;

            let signals = LoggingSignals;
            let opener = SystemOpener;
            let content = NoContent;
            let is_mac = platform.is_mac();
            let dispatcher = Dispatcher::new(
                HostServices {
                    signals: &signals,
                    opener: &opener,
                    content: &content,
                    windows: &window,
                },
                platform,
                settings.mode,
            );

            match node {
                MenuNode::Action(item) => dispatcher.activate(item, Some(&window)),
                MenuNode::Role(item) if is_mac => {
                    info!(role = ?item.role, "handled by the AppKit responder chain");
                }
                MenuNode::Role(item) => {
                    if !dispatcher.activate_role(item.role, Some(&window)) {
                        info!(role = ?item.role, "role has no host action");
                    }
                }
                MenuNode::Submenu(_) | MenuNode::Separator => {
                    bail!("'{path}' is not an activatable item");
                }
            }
        }
        Command::ConfigPath => {
            if let Some(path) = config::resolve_config_path() {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

fn resolve_platform(arg: Option<&str>) -> Platform {
    arg.map(Platform::from_identifier)
        .unwrap_or_else(Platform::current)
}

fn print_section(section: &Submenu, depth: usize) {
    let indent = "  ".repeat(depth);
    match section.role {
        Some(role) => println!("{indent}{} [{role:?}]", section.label),
        None => println!("{indent}{}", section.label),
    }
    for node in &section.items {
        let indent = "  ".repeat(depth + 1);
        match node {
            MenuNode::Separator => println!("{indent}----"),
            MenuNode::Action(item) => {
                let action = match &item.action {
                    Some(menu::Action::Builtin(cmd)) => cmd.name(),
                    Some(menu::Action::Custom(_)) => "custom",
                    None => "unwired",
                };
                println!(
                    "{indent}{:<40} {:<22} -> {action}",
                    item.label,
                    item.accelerator.as_deref().unwrap_or("")
                );
            }
            MenuNode::Role(item) => println!(
                "{indent}{:<40} {:<22} [{:?}]",
                item.label,
                item.accelerator.as_deref().unwrap_or(""),
                item.role
            ),
            MenuNode::Submenu(child) => print_section(child, depth + 1),
        }
    }
}
