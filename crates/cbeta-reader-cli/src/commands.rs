use anyhow::{Context, Result};
use cbeta_reader_config::Config;
use cbeta_reader_engine::{MappedDocument, NumberedMarkers, Segment, io, render_with};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Read CBETA canon XML as plain text", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/cbeta-reader/config.toml
    #[arg(long, global = true, value_name = "FILE", env = "CBETA_READER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the reading text
    #[command(arg_required_else_help = true)]
    Render {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print every segment as `key start..end`
    #[command(arg_required_else_help = true)]
    Segments {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show segment, base and XML offsets for a caret
    #[command(arg_required_else_help = true)]
    Locate {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Caret position in the display text, in characters
        #[arg(value_name = "DISPLAY_OFFSET")]
        display_offset: usize,
    },

    /// Show where an XML offset appears in the text
    #[command(arg_required_else_help = true)]
    Reveal {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Position in the XML source, in characters
        #[arg(value_name = "XML_OFFSET")]
        xml_offset: usize,
    },

    /// Write a config file pointing at a corpus
    #[command(arg_required_else_help = true)]
    Init {
        #[arg(value_name = "DIRECTORY_PATH")]
        corpus_dir: PathBuf,

        /// Collect notes into markers instead of rendering them inline
        #[arg(long)]
        collect_notes: bool,
    },

    /// List XML files in the corpus
    List {
        /// Corpus root; defaults to corpus_path from the config file
        #[arg(value_name = "DIRECTORY_PATH")]
        corpus_dir: Option<PathBuf>,
    },
}

/// Renders `file` with the configured options and maps it.
fn load_document(file: &Path, config: Option<&Config>) -> Result<MappedDocument> {
    let xml = io::read_xml_file(file).with_context(|| format!("reading {}", file.display()))?;
    let options = config.map(|c| c.render.clone()).unwrap_or_default();
    let style = config.map(|c| c.marker_style).unwrap_or_default();

    let rendered = render_with(&xml, &options);
    Ok(MappedDocument::from_rendered(
        &rendered,
        &NumberedMarkers::new(style),
    ))
}

fn describe_segment(segment: Option<&Segment>) -> String {
    match segment {
        Some(s) => format!("{} {}..{}", s.key, s.start(), s.end()),
        None => "-".to_string(),
    }
}

/// Runs `command`. `config` is the loaded config file, if any, and
/// `config_path` where it lives.
pub fn run(
    command: &Command,
    config: Option<&Config>,
    config_path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Render { file } => {
            let doc = load_document(file, config)?;
            writeln!(out, "{}", doc.display_text())?;
        }
        Command::Segments { file } => {
            let doc = load_document(file, config)?;
            for segment in doc.segments() {
                writeln!(out, "{}", describe_segment(Some(segment)))?;
            }
        }
        Command::Locate {
            file,
            display_offset,
        } => {
            let doc = load_document(file, config)?;
            let base = doc.display_index_to_base_index(*display_offset);
            writeln!(
                out,
                "segment: {}",
                describe_segment(doc.find_segment_at_or_before(base))
            )?;
            writeln!(out, "base: {base}")?;
            match doc.display_index_to_xml_index(*display_offset) {
                Some(xml) => writeln!(out, "xml: {xml}")?,
                None => writeln!(out, "xml: -")?,
            }
            if let Some(note) = doc.annotation_by_marker_at(*display_offset) {
                let kind = note.kind.as_deref().unwrap_or("-");
                let resp = note.resp.as_deref().unwrap_or("-");
                writeln!(out, "note: [{kind}/{resp}] {}", note.text)?;
            }
        }
        Command::Reveal { file, xml_offset } => {
            let doc = load_document(file, config)?;
            let Some(display) = doc.find_rendered_offset_by_xml_index(*xml_offset) else {
                writeln!(out, "display: -")?;
                return Ok(());
            };
            let base = doc.display_index_to_base_index(display);
            writeln!(out, "display: {display}")?;
            writeln!(
                out,
                "segment: {}",
                describe_segment(doc.find_segment_at_or_before(base))
            )?;
        }
        Command::Init {
            corpus_dir,
            collect_notes,
        } => {
            io::validate_corpus_dir(corpus_dir)?;
            let mut new_config = config.cloned().unwrap_or_else(|| Config::new(corpus_dir));
            new_config.corpus_path = corpus_dir.clone();
            new_config.render.collect_notes |= *collect_notes;
            new_config
                .save_to_path(config_path)
                .with_context(|| format!("writing {}", config_path.display()))?;
            log::info!("Saved config to {}", config_path.display());
            writeln!(out, "{}", config_path.display())?;
        }
        Command::List { corpus_dir } => {
            let root = match (corpus_dir, config) {
                (Some(dir), _) => dir.as_path(),
                (None, Some(config)) => config.corpus_dir()?,
                (None, None) => anyhow::bail!(
                    "No corpus directory given and no config file found at {}",
                    config_path.display()
                ),
            };
            let files = io::scan_xml_files(root)
                .with_context(|| format!("listing corpus '{}'", root.display()))?;
            for file in files {
                let shown = file.strip_prefix(root).unwrap_or(&file);
                writeln!(out, "{}", shown.display())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbeta_reader_engine::{MarkerStyle, RenderOptions};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const XML: &str = r#"<p xml:id="p1">佛說<note type="orig">校勘</note>經<lb n="1"/>如是</p>"#;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("cbeta-reader-cli").chain(args.iter().copied()))
    }

    fn write_xml(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    fn notes_config(dir: &TempDir) -> Config {
        Config {
            corpus_path: dir.path().to_path_buf(),
            marker_style: MarkerStyle::Bracketed,
            render: RenderOptions {
                collect_notes: true,
            },
        }
    }

    fn output(command: &Command, config: Option<&Config>) -> String {
        let mut out = Vec::new();
        run(command, config, Path::new("/nonexistent/config.toml"), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse(&["render", "a.xml"]).unwrap().command,
            Command::Render {
                file: "a.xml".into()
            }
        );
        assert_eq!(
            parse(&["locate", "a.xml", "12"]).unwrap().command,
            Command::Locate {
                file: "a.xml".into(),
                display_offset: 12
            }
        );
        assert_eq!(
            parse(&["list"]).unwrap().command,
            Command::List { corpus_dir: None }
        );
    }

    #[test]
    fn config_flag_is_global() {
        let cli = parse(&["list", "--config", "/tmp/reader.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/reader.toml")));
    }

    #[test]
    fn rejects_bad_arguments() {
        use clap::error::ErrorKind;

        let kind = |args: &[&str]| parse(args).unwrap_err().kind();
        assert!(parse(&[]).is_err());
        assert!(parse(&["reveal", "a.xml", "-3"]).is_err());
        assert_eq!(kind(&["frobnicate"]), ErrorKind::InvalidSubcommand);
        assert_eq!(kind(&["locate", "a.xml", "x"]), ErrorKind::ValueValidation);
        assert_eq!(
            kind(&["segments"]),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn render_without_config_keeps_notes_inline() {
        let dir = TempDir::new().unwrap();
        let file = write_xml(&dir, "a.xml", XML);

        let text = output(&Command::Render { file }, None);
        assert_eq!(text, "佛說 校勘 經\n如是\n");
    }

    #[test]
    fn render_with_config_inserts_markers() {
        let dir = TempDir::new().unwrap();
        let file = write_xml(&dir, "a.xml", XML);
        let config = notes_config(&dir);

        let text = output(&Command::Render { file }, Some(&config));
        assert_eq!(text, "佛說[1] 經\n如是\n");
    }

    #[test]
    fn segments_lists_keys_and_spans() {
        let dir = TempDir::new().unwrap();
        let file = write_xml(&dir, "a.xml", XML);

        let text = output(&Command::Segments { file }, None);
        assert_eq!(text, "START 0..0\np|p1 0..7\nlb|1 8..10\n");
    }

    #[test]
    fn locate_reports_note_under_marker() {
        let dir = TempDir::new().unwrap();
        let file = write_xml(&dir, "a.xml", XML);
        let config = notes_config(&dir);

        // <p xml:id="p1"> is 15 chars, so 佛 is at 15, 說 at 16, <note ...> at 17
        let text = output(
            &Command::Locate {
                file,
                display_offset: 3,
            },
            Some(&config),
        );
        assert_eq!(
            text,
            "segment: p|p1 0..4\nbase: 2\nxml: 17\nnote: [orig/-] 校勘\n"
        );
    }

    #[test]
    fn reveal_lands_after_marker() {
        let dir = TempDir::new().unwrap();
        let file = write_xml(&dir, "a.xml", XML);
        let config = notes_config(&dir);

        // 經 follows `<note type="orig">校勘</note>` (17 + 18 + 2 + 7 = 44)
        let text = output(
            &Command::Reveal {
                file,
                xml_offset: 44,
            },
            Some(&config),
        );
        assert_eq!(text, "display: 6\nsegment: p|p1 0..4\n");
    }

    #[test]
    fn list_prefers_argument_over_config() {
        let dir = TempDir::new().unwrap();
        write_xml(&dir, "T/T01n0001.xml", "<TEI/>");
        write_xml(&dir, "T/notes.txt", "");
        let other = TempDir::new().unwrap();
        let config = Config::new(other.path());

        let text = output(
            &Command::List {
                corpus_dir: Some(dir.path().to_path_buf()),
            },
            Some(&config),
        );
        assert_eq!(text, format!("{}\n", Path::new("T").join("T01n0001.xml").display()));

        let text = output(&Command::List { corpus_dir: None }, Some(&config));
        assert_eq!(text, "");
    }

    #[test]
    fn list_reports_unusable_configured_corpus() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(dir.path().join("missing"));

        let mut out = Vec::new();
        let err = run(
            &Command::List { corpus_dir: None },
            Some(&config),
            &dir.path().join("config.toml"),
            &mut out,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Configured corpus_path"));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn list_without_any_corpus_fails() {
        let mut out = Vec::new();
        let config_path = Path::new("/nonexistent/config.toml");
        let list = Command::List { corpus_dir: None };
        let err = run(&list, None, config_path, &mut out).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No corpus directory given and no config file found at /nonexistent/config.toml"
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let mut out = Vec::new();
        let err = run(
            &Command::Render {
                file: "/nonexistent/a.xml".into(),
            },
            None,
            Path::new("/nonexistent/config.toml"),
            &mut out,
        )
        .unwrap_err();
        assert!(err.to_string().contains("reading /nonexistent/a.xml"));
    }

    #[test]
    fn init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("conf").join("config.toml");
        let init = Command::Init {
            corpus_dir: dir.path().to_path_buf(),
            collect_notes: true,
        };

        let mut out = Vec::new();
        run(&init, None, &config_path, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\n", config_path.display())
        );
        let saved = Config::load_from_path(&config_path).unwrap().unwrap();
        assert_eq!(saved.corpus_path, dir.path());
        assert!(saved.render.collect_notes);
        assert_eq!(saved.marker_style, MarkerStyle::Superscript);
    }

    #[test]
    fn init_keeps_existing_settings() {
        let dir = TempDir::new().unwrap();
        let corpus = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        let existing = notes_config(&dir);
        let init = Command::Init {
            corpus_dir: corpus.path().to_path_buf(),
            collect_notes: false,
        };

        run(&init, Some(&existing), &config_path, &mut Vec::new()).unwrap();

        let saved = Config::load_from_path(&config_path).unwrap().unwrap();
        assert_eq!(saved.corpus_path, corpus.path());
        assert_eq!(saved.marker_style, MarkerStyle::Bracketed);
        assert!(saved.render.collect_notes);
    }

    #[test]
    fn init_rejects_missing_corpus() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        let init = Command::Init {
            corpus_dir: dir.path().join("missing"),
            collect_notes: false,
        };

        assert!(run(&init, None, &config_path, &mut Vec::new()).is_err());
        assert!(!config_path.exists());
    }
}
