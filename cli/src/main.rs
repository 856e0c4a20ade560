//! docx2pdf - lay the paragraphs of a Word document or text file out onto PDF pages

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use pdf_reflow::layout::{Margins, PageGeometry};
use pdf_reflow::pagesize::{self, PageOrientation};
use pdf_reflow::{
    convert_file, ConversionReport, FontSpec, Pt, ReflowConfig, ReflowError, StandardFont,
};

#[derive(Parser, Debug)]
#[command(name = "docx2pdf")]
#[command(version)]
#[command(about = "Convert a Word document or text file to a paginated PDF", long_about = None)]
struct Cli {
    /// Input document (.docx, or anything else as plain text)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output PDF (defaults to the input with a .pdf extension)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// JSON configuration file; other flags override its values
    #[arg(short, long, value_name = "FILE", env = "DOCX2PDF_CONFIG")]
    config: Option<PathBuf>,

    /// Page size: letter, half-letter, legal, tabloid, a3, a4 or a5
    #[arg(long, value_name = "NAME")]
    page_size: Option<String>,

    /// Turn the page sideways
    #[arg(long)]
    landscape: bool,

    /// Distance of all four margins from the page edges, in points
    #[arg(long, value_name = "PT")]
    margin: Option<f32>,

    /// Baseline of the first line on each page, in points from the bottom edge
    #[arg(long, value_name = "PT")]
    top: Option<f32>,

    /// Lowest baseline a line may sit on, in points from the bottom edge
    #[arg(long, value_name = "PT")]
    bottom: Option<f32>,

    /// Distance between baselines, in points
    #[arg(long, value_name = "PT")]
    line_height: Option<f32>,

    /// Standard font: helvetica, times, courier (or their -bold variants)
    #[arg(long, value_name = "NAME", conflicts_with = "font_file")]
    font: Option<String>,

    /// TrueType / OpenType font to embed instead of a standard font
    #[arg(long, value_name = "FILE")]
    font_file: Option<PathBuf>,

    /// Font size, in points
    #[arg(long, value_name = "PT")]
    font_size: Option<f32>,

    /// Wrap paragraphs that are wider than the page instead of letting them run off it
    #[arg(long)]
    wrap: bool,

    /// Document title (defaults to the input file name)
    #[arg(long)]
    title: Option<String>,
}

impl Cli {
    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("pdf"))
    }

    /// Start from the configuration file (or the defaults) and apply every flag on top
    fn config(&self) -> Result<ReflowConfig, ReflowError> {
        let mut config = match &self.config {
            Some(path) => ReflowConfig::from_json_file(path)?,
            None => ReflowConfig::default(),
        };

        let mut geometry = config.geometry;
        if self.page_size.is_some() || self.landscape {
            let mut size = match &self.page_size {
                Some(name) => pagesize::by_name(name)?,
                None => (geometry.page_width, geometry.page_height),
            };
            if self.landscape {
                size = size.landscape();
            }
            geometry = geometry.with_page_size(size);
        }
        if let Some(margin) = self.margin {
            geometry = PageGeometry::from_page_size(
                (geometry.page_width, geometry.page_height),
                &Margins::all(Pt(margin)),
                geometry.line_height,
            );
        }
        if let Some(top) = self.top {
            geometry = geometry.with_top_margin(Pt(top));
        }
        if let Some(bottom) = self.bottom {
            geometry = geometry.with_bottom_margin(Pt(bottom));
        }
        if let Some(line_height) = self.line_height {
            geometry = geometry.with_line_height(Pt(line_height));
        }
        config.geometry = geometry;

        if let Some(name) = &self.font {
            config.font = FontSpec::Standard(name.parse::<StandardFont>()?);
        }
        if let Some(path) = &self.font_file {
            config.font = FontSpec::File(path.clone());
        }
        if let Some(size) = self.font_size {
            config.font_size = Pt(size);
        }
        if self.wrap {
            config.wrap = true;
        }
        if let Some(title) = &self.title {
            config.title = Some(title.clone());
        }

        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<ConversionReport, ReflowError> {
    let config = cli.config()?;
    log::debug!("configuration: {config:?}");
    convert_file(&cli.input, cli.output_path(), &config)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) => {
            let output = report.output.unwrap_or_else(|| cli.output_path());
            println!(
                "Converted {} to {} ({} page{})",
                display(&cli.input),
                display(&output),
                report.pages,
                if report.pages == 1 { "" } else { "s" }
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error converting {}: {err}", display(&cli.input));
            ExitCode::FAILURE
        }
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("docx2pdf").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn output_defaults_next_to_input() {
        let cli = parse(&["reports/q3.docx"]);
        assert_eq!(cli.output_path(), PathBuf::from("reports/q3.pdf"));
    }

    #[test]
    fn pdf_input_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.pdf");
        std::fs::write(&input, "plain text in disguise\n").unwrap();

        let cli = parse(&[input.to_str().unwrap()]);
        assert_eq!(cli.output_path(), input);
        assert!(matches!(run(&cli), Err(ReflowError::OutputIsInput(_))));
        assert_eq!(
            std::fs::read_to_string(&input).unwrap(),
            "plain text in disguise\n"
        );
    }

    #[test]
    fn writes_next_to_the_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, "one\ntwo\n").unwrap();

        let report = run(&parse(&[input.to_str().unwrap()])).unwrap();
        assert_eq!(report.output, Some(dir.path().join("notes.pdf")));
        assert_eq!(report.pages, 1);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "in.txt",
            "--line-height",
            "14",
            "--bottom",
            "36",
            "--font",
            "courier",
            "--font-size",
            "10",
            "--wrap",
        ]);
        let config = cli.config().unwrap();
        assert_eq!(config.geometry.line_height, Pt(14.0));
        assert_eq!(config.geometry.bottom_margin, Pt(36.0));
        assert_eq!(config.geometry.top_margin, Pt(750.0));
        assert_eq!(config.font, FontSpec::Standard(StandardFont::Courier));
        assert_eq!(config.font_size, Pt(10.0));
        assert!(config.wrap);
    }

    #[test]
    fn page_size_and_margin() {
        let cli = parse(&["in.txt", "--page-size", "letter", "--landscape", "--margin", "36"]);
        let geometry = cli.config().unwrap().geometry;
        assert_eq!(geometry.page_width, Pt(792.0));
        assert_eq!(geometry.page_height, Pt(612.0));
        assert_eq!(geometry.top_margin, Pt(576.0));
        assert_eq!(geometry.bottom_margin, Pt(36.0));
        assert_eq!(geometry.left_margin, Pt(36.0));
    }

    #[test]
    fn unknown_names_are_errors() {
        let cli = parse(&["in.txt", "--page-size", "b5"]);
        assert!(matches!(cli.config(), Err(ReflowError::Format(_))));

        let cli = parse(&["in.txt", "--font", "papyrus"]);
        assert!(matches!(cli.config(), Err(ReflowError::Format(_))));
    }

    #[test]
    fn config_file_is_the_base() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reflow.json");
        std::fs::write(&path, r#"{ "font_size": 9.5, "geometry": { "line_height": 11.0 } }"#)
            .unwrap();

        let cli = parse(&["in.txt", "--config", path.to_str().unwrap(), "--line-height", "12"]);
        let config = cli.config().unwrap();
        assert_eq!(config.font_size, Pt(9.5));
        assert_eq!(config.geometry.line_height, Pt(12.0));
    }
}
