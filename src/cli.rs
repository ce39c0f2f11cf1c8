use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use spatha::{ButtonFunction, MacroRecorder, PollingRate};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(about, version, author)]
pub struct Cli {
    /// Directory holding the profile files. Overrides the settings file.
    #[arg(long, global = true)]
    pub profile_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the settings stored in a profile
    Show {
        /// Profile name (defaults to the configured default profile)
        profile: Option<String>,
    },

    /// Change settings and save them under a profile name
    Save {
        profile: String,

        /// Sensor DPI (400-19000)
        #[arg(long)]
        dpi: Option<u32>,

        /// Polling rate: 125Hz, 250Hz, 500Hz or 1000Hz
        #[arg(long, value_parser = parse_polling_rate)]
        polling_rate: Option<PollingRate>,

        #[arg(long)]
        description: Option<String>,

        /// Assign a button: INDEX=FUNCTION[:PARAMETER], index 0-11, e.g. "3=Keystroke:Ctrl+C"
        #[arg(long = "button", value_parser = parse_button_assignment)]
        buttons: Vec<ButtonAssignment>,

        /// Record a macro on a button: INDEX=KEY,KEY,... e.g. "5=Ctrl,Shift,S"
        #[arg(long = "macro", value_parser = parse_macro_assignment)]
        macros: Vec<ButtonAssignment>,

        /// Number of DPI stages (1-5)
        #[arg(long)]
        dpi_stages: Option<u8>,

        #[arg(long)]
        angle_snapping: Option<bool>,
    },

    /// Commit a profile's settings to the device
    Apply {
        profile: Option<String>,
    },

    /// List known profiles
    List,
}

#[derive(Debug, Clone)]
pub struct ButtonAssignment {
    pub index: usize,
    pub function: ButtonFunction,
    pub parameter: Option<String>,
}

fn parse_polling_rate(value: &str) -> Result<PollingRate> {
    PollingRate::parse(value).map_err(|e| anyhow!("{}", e))
}

fn split_index(value: &str) -> Result<(usize, &str)> {
    let (index, rest) = value
        .split_once('=')
        .context("expected INDEX=VALUE")?;
    let index = index
        .trim()
        .parse::<usize>()
        .with_context(|| format!("invalid button index '{}'", index))?;
    Ok((index, rest))
}

fn parse_button_assignment(value: &str) -> Result<ButtonAssignment> {
    let (index, rest) = split_index(value)?;
    let (function, parameter) = match rest.split_once(':') {
        Some((function, parameter)) => (function, Some(parameter.to_string())),
        None => (rest, None),
    };

    let function = ButtonFunction::from_str(function.trim()).map_err(|_| {
        let known: Vec<&str> = ButtonFunction::all().map(ButtonFunction::label).collect();
        anyhow!("unknown function '{}' (one of: {})", function, known.join(", "))
    })?;

    Ok(ButtonAssignment {
        index,
        function,
        parameter,
    })
}

fn parse_macro_assignment(value: &str) -> Result<ButtonAssignment> {
    let (index, keys) = split_index(value)?;

    let mut recorder = MacroRecorder::new();
    recorder.start();
    for key in keys.split(',') {
        recorder.record_key(key);
    }
    recorder.stop();

    if recorder.keys().is_empty() {
        bail!("macro for button {} has no keys", index);
    }

    Ok(ButtonAssignment {
        index,
        function: ButtonFunction::Macro,
        parameter: Some(recorder.sequence()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_button_assignment() {
        let a = parse_button_assignment("3=Keystroke:Ctrl+C").unwrap();
        assert_eq!(a.index, 3);
        assert_eq!(a.function, ButtonFunction::Keystroke);
        assert_eq!(a.parameter.as_deref(), Some("Ctrl+C"));

        let a = parse_button_assignment("0=Right Click").unwrap();
        assert_eq!(a.function, ButtonFunction::RightClick);
        assert!(a.parameter.is_none());

        let a = parse_button_assignment("9=Application:C:\\Games\\game.exe").unwrap();
        assert_eq!(a.parameter.as_deref(), Some("C:\\Games\\game.exe"));
    }

    #[test]
    fn test_parse_button_assignment_errors() {
        assert!(parse_button_assignment("Keystroke").is_err());
        assert!(parse_button_assignment("x=Keystroke").is_err());
        assert!(parse_button_assignment("1=Jump").is_err());
    }

    #[test]
    fn test_parse_macro_assignment() {
        let a = parse_macro_assignment("5=Ctrl,Shift,S,S").unwrap();
        assert_eq!(a.function, ButtonFunction::Macro);
        assert_eq!(a.parameter.as_deref(), Some("Ctrl + Shift + S"));
        assert!(parse_macro_assignment("5=").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "spatha",
            "save",
            "Gaming",
            "--dpi",
            "1600",
            "--polling-rate",
            "500Hz",
            "--button",
            "0=Right Click",
        ])
        .unwrap();

        match cli.command {
            Command::Save {
                profile,
                dpi,
                polling_rate,
                buttons,
                ..
            } => {
                assert_eq!(profile, "Gaming");
                assert_eq!(dpi, Some(1600));
                assert_eq!(polling_rate, Some(PollingRate::Hz500));
                assert_eq!(buttons.len(), 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
