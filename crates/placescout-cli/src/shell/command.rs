//! Shell command parsing.

use std::path::PathBuf;

pub(crate) const HELP: &str = "\
Komutlar:
  search <sektör> / <şehir>   Google Places araması yap, tabloyu yenile
  show                        tabloyu göster
  export [dosya.xlsx]         tabloyu Excel dosyasına kaydet
  check                       telefonları WhatsApp'ta kontrol et
  ask <soru>                  asistana soru sor
  help                        bu mesajı göster
  quit                        çık";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellCommand {
    Empty,
    Search { sector: String, city: String },
    Show,
    Export { path: Option<PathBuf> },
    Check,
    Ask { prompt: String },
    Help,
    Quit,
}

/// Parses one input line. The error is a message for the operator.
pub(crate) fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_lowercase().as_str() {
        "" => Ok(ShellCommand::Empty),
        "search" => {
            let (sector, city) = rest
                .split_once('/')
                .ok_or_else(|| "kullanım: search <sektör> / <şehir>".to_owned())?;
            Ok(ShellCommand::Search {
                sector: sector.trim().to_owned(),
                city: city.trim().to_owned(),
            })
        }
        "show" => Ok(ShellCommand::Show),
        "export" => Ok(ShellCommand::Export {
            path: (!rest.is_empty()).then(|| PathBuf::from(rest)),
        }),
        "check" => Ok(ShellCommand::Check),
        "ask" => Ok(ShellCommand::Ask {
            prompt: rest.to_owned(),
        }),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("bilinmeyen komut '{other}' ('help' yazın)")),
    }
}
