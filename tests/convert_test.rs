//! Integration tests for whole-file conversion.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use pdf_reflow::source::{DocxSource, ParagraphSource};
use pdf_reflow::{
    convert, convert_file, ConfigurationError, ConversionReport, FontSpec, FormatError, Pt,
    ReflowConfig, ReflowError,
};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Build a minimal Word document with one `<w:p>` per paragraph
fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let mut body = String::new();
    for text in paragraphs {
        if text.is_empty() {
            body.push_str("<w:p/>");
        } else {
            body.push_str(&format!(
                "<w:p><w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>"
            ));
        }
    }
    let document = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}<w:sectPr/></w:body></w:document>"
    );

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(b"<Types/>").unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

fn leftovers(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".pdf-reflow-"))
        .collect()
}

#[test]
fn test_docx_paragraphs_in_order() {
    let bytes = docx_bytes(&["Dear reader,", "", "Fish &amp; chips", "Regards"]);
    let mut source = DocxSource::from_reader(Cursor::new(bytes)).unwrap();
    let texts: Vec<String> = source
        .paragraphs()
        .unwrap()
        .into_iter()
        .map(|b| b.text().to_string())
        .collect();

    assert_eq!(texts, vec!["Dear reader,", "", "Fish & chips", "Regards"]);
}

#[test]
fn test_convert_docx_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("letter.docx");
    let output = dir.path().join("letter.pdf");

    let lines: Vec<String> = (1..=40).map(|i| format!("Paragraph {i}")).collect();
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    fs::write(&input, docx_bytes(&lines)).unwrap();

    let report = convert_file(&input, &output, &ReflowConfig::default()).unwrap();
    assert_eq!(
        report,
        ConversionReport {
            paragraphs: 40,
            lines: 40,
            pages: 2,
            output: Some(output.clone()),
        }
    );

    let pdf = fs::read(&output).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(String::from_utf8_lossy(&pdf).contains("/Count 2"));
    assert!(leftovers(dir.path()).is_empty());
}

#[test]
fn test_convert_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    let output = dir.path().join("out").join("notes.pdf");
    fs::create_dir(dir.path().join("out")).unwrap();

    let text: String = (0..100)
        .map(|i| format!("{}\n", lipsum::lipsum_words(i % 8 + 1)))
        .collect();
    fs::write(&input, text).unwrap();

    let report = convert_file(&input, &output, &ReflowConfig::default()).unwrap();
    assert_eq!(report.paragraphs, 100);
    // 36 lines per page
    assert_eq!(report.pages, 3);
    assert!(output.exists());
}

#[test]
fn test_empty_document_is_one_blank_page() {
    let mut out = Vec::new();
    let mut source = DocxSource::from_reader(Cursor::new(docx_bytes(&[]))).unwrap();
    let report = convert(&mut source, &ReflowConfig::default(), &mut out).unwrap();

    assert_eq!(report.paragraphs, 0);
    assert_eq!(report.pages, 1);
    assert!(String::from_utf8_lossy(&out).contains("/Count 1"));
}

#[test]
fn test_failed_conversion_keeps_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.docx");
    let output = dir.path().join("broken.pdf");
    fs::write(&input, b"this is not a zip archive").unwrap();
    fs::write(&output, b"previous contents").unwrap();

    let result = convert_file(&input, &output, &ReflowConfig::default());
    assert!(matches!(
        result,
        Err(ReflowError::Format(FormatError::NotDocx(_)))
    ));
    assert_eq!(fs::read(&output).unwrap(), b"previous contents");
    assert!(leftovers(dir.path()).is_empty());
}

#[test]
fn test_missing_document_part() {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("word/styles.xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"<w:styles/>").unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    let mut source = DocxSource::from_reader(Cursor::new(bytes)).unwrap();
    assert!(matches!(
        source.paragraphs(),
        Err(ReflowError::Format(FormatError::MissingDocumentPart))
    ));
}

#[test]
fn test_invalid_configuration_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    let output = dir.path().join("notes.pdf");
    fs::write(&input, "one\ntwo\n").unwrap();

    let mut config = ReflowConfig::default();
    config.geometry.top_margin = Pt(40.0);

    let result = convert_file(&input, &output, &config);
    assert!(matches!(
        result,
        Err(ReflowError::Configuration(
            ConfigurationError::MarginsInverted { .. }
        ))
    ));
    assert!(!output.exists());
    assert!(leftovers(dir.path()).is_empty());
}

#[test]
fn test_missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = convert_file(
        dir.path().join("nope.docx"),
        dir.path().join("nope.pdf"),
        &ReflowConfig::default(),
    );
    assert!(matches!(result, Err(ReflowError::Io(_))));
    assert!(!dir.path().join("nope.pdf").exists());
}

#[test]
fn test_config_file_drives_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("reflow.json");
    fs::write(
        &config_path,
        r#"{ "geometry": { "line_height": 10.0 }, "font": { "standard": "times-roman" } }"#,
    )
    .unwrap();
    let config = ReflowConfig::from_json_file(&config_path).unwrap();

    let input = dir.path().join("notes.txt");
    let output = dir.path().join("notes.pdf");
    let text: String = (0..100).map(|i| format!("line {i}\n")).collect();
    fs::write(&input, text).unwrap();

    // (750 - 50) / 10 + 1 = 71 lines per page
    let report = convert_file(&input, &output, &config).unwrap();
    assert_eq!(report.pages, 2);
    let pdf = fs::read(&output).unwrap();
    assert!(String::from_utf8_lossy(&pdf).contains("/BaseFont /Times-Roman"));
}

#[test]
fn test_embedded_font_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("greeting.docx");
    let output = dir.path().join("greeting.pdf");
    fs::write(&input, docx_bytes(&["Grüße aus Köln", "Ελληνικά"])).unwrap();

    let config = ReflowConfig {
        font: FontSpec::File(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/DejaVuSansMono.ttf"),
        ),
        wrap: true,
        ..ReflowConfig::default()
    };
    let report = convert_file(&input, &output, &config).unwrap();
    assert_eq!(report.paragraphs, 2);
    assert_eq!(report.lines, 2);
    assert_eq!(report.pages, 1);

    let pdf = fs::read(&output).unwrap();
    let pdf = String::from_utf8_lossy(&pdf);
    assert!(pdf.contains("/Type0"));
    assert!(pdf.contains("/ToUnicode"));
}

#[test]
fn test_missing_font_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "one\n").unwrap();

    let config = ReflowConfig {
        font: FontSpec::File(dir.path().join("missing.ttf")),
        ..ReflowConfig::default()
    };
    let result = convert_file(&input, dir.path().join("notes.pdf"), &config);
    assert!(matches!(result, Err(ReflowError::Io(_))));
    assert!(leftovers(dir.path()).is_empty());
}
