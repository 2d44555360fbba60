/*!
 * Document rendering for files-to-prompt
 *
 * The tagged format is written through quick-xml with pre-escaped events:
 * paths and contents are emitted exactly as read, so a document whose body
 * contains markup is not well-formed XML. The output is meant for a model's
 * context window, not an XML parser.
 */

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::Config;
use crate::error::{FtpError, Result};

/// Sentence written ahead of the `<documents>` envelope
pub const XML_PREAMBLE: &str = "Here are some documents for you to reference for your task:";

/// Delimiter line used by the plain format
const PLAIN_DELIMITER: &str = "---";

/// Output format for rendered documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `path`, `---`, content, blank line, `---`
    #[default]
    Plain,
    /// `<document path="...">` blocks inside a `<documents>` envelope
    Xml,
}

/// Writes rendered documents to any byte stream
pub struct DocumentWriter<W: Write> {
    format: OutputFormat,
    writer: Writer<W>,
}

impl<W: Write> DocumentWriter<W> {
    /// Create a new document writer
    pub fn new(inner: W, format: OutputFormat) -> Self {
        Self {
            format,
            writer: Writer::new(inner),
        }
    }

    /// Write the envelope opening, if the format has one
    pub fn begin(&mut self) -> io::Result<()> {
        if self.format == OutputFormat::Xml {
            let out = self.writer.get_mut();
            writeln!(out, "{}", XML_PREAMBLE)?;
            writeln!(out)?;
            self.writer
                .write_event(Event::Start(BytesStart::new("documents")))?;
            self.newline()?;
        }
        Ok(())
    }

    /// Render one file
    pub fn write_document(&mut self, path: &Path, content: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Plain => self.write_plain(path, content),
            OutputFormat::Xml => self.write_xml(path, content),
        }
    }

    /// Write the envelope closing, flush, and hand back the stream
    pub fn finish(mut self) -> io::Result<W> {
        if self.format == OutputFormat::Xml {
            self.writer
                .write_event(Event::End(BytesEnd::new("documents")))?;
            self.newline()?;
        }
        self.writer.get_mut().flush()?;
        Ok(self.writer.into_inner())
    }

    fn write_plain(&mut self, path: &Path, content: &str) -> io::Result<()> {
        let out = self.writer.get_mut();
        writeln!(out, "{}", path.display())?;
        writeln!(out, "{}", PLAIN_DELIMITER)?;
        writeln!(out, "{}", content)?;
        writeln!(out)?;
        writeln!(out, "{}", PLAIN_DELIMITER)?;
        Ok(())
    }

    fn write_xml(&mut self, path: &Path, content: &str) -> io::Result<()> {
        // Raw start tag: the path attribute is not escaped
        let tag = format!("document path=\"{}\"", path.display());
        self.writer
            .write_event(Event::Start(BytesStart::from_content(tag, "document".len())))?;
        self.newline()?;
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(content)))?;
        self.newline()?;
        self.writer
            .write_event(Event::End(BytesEnd::new("document")))?;
        self.newline()
    }

    fn newline(&mut self) -> io::Result<()> {
        self.writer.write_event(Event::Text(BytesText::from_escaped("\n")))
    }
}

/// Where rendered output goes: the console or a file the user asked for
pub enum OutputSink {
    Stdout(io::Stdout),
    File(BufWriter<File>),
}

impl OutputSink {
    /// Open the sink described by the configuration.
    ///
    /// An existing output file is only replaced when `force` is set; the
    /// check and the creation are a single `create_new` open, so a refused
    /// run leaves the file untouched.
    pub fn open(config: &Config) -> Result<Self> {
        let Some(path) = &config.output_file else {
            return Ok(OutputSink::Stdout(io::stdout()));
        };

        let mut options = OpenOptions::new();
        options.write(true);
        if config.force {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        match options.open(path) {
            Ok(file) => Ok(OutputSink::File(BufWriter::new(file))),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                crate::bail!(OutputExists, path.as_path())
            }
            Err(source) => Err(FtpError::OutputOpen {
                path: path.clone(),
                source,
            }),
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputSink::Stdout(out) => out.write(buf),
            OutputSink::File(out) => out.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputSink::Stdout(out) => out.flush(),
            OutputSink::File(out) => out.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn render(format: OutputFormat, docs: &[(&str, &str)]) -> String {
        let mut writer = DocumentWriter::new(Vec::new(), format);
        writer.begin().unwrap();
        for (path, content) in docs {
            writer.write_document(Path::new(path), content).unwrap();
        }
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_plain_block() {
        let out = render(OutputFormat::Plain, &[("dir/a.txt", "hello")]);
        assert_eq!(out, "dir/a.txt\n---\nhello\n\n---\n");
    }

    #[test]
    fn test_plain_has_no_envelope() {
        assert_eq!(render(OutputFormat::Plain, &[]), "");
    }

    #[test]
    fn test_xml_envelope_and_blocks() {
        let out = render(OutputFormat::Xml, &[("a.txt", "one"), ("b.txt", "two")]);
        assert_eq!(
            out,
            "Here are some documents for you to reference for your task:\n\n\
             <documents>\n\
             <document path=\"a.txt\">\none\n</document>\n\
             <document path=\"b.txt\">\ntwo\n</document>\n\
             </documents>\n"
        );
    }

    #[test]
    fn test_xml_does_not_escape() {
        let out = render(OutputFormat::Xml, &[("x&y.html", "<b>\"bold\" & more</b>")]);
        assert!(out.contains("<document path=\"x&y.html\">\n<b>\"bold\" & more</b>\n</document>"));
    }

    fn config_for(output: PathBuf, force: bool) -> Config {
        Config {
            output_file: Some(output),
            force,
            ..Config::default()
        }
    }

    #[test]
    fn test_sink_refuses_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "keep me").unwrap();

        let err = OutputSink::open(&config_for(path.clone(), false))
            .err()
            .expect("existing file should be refused");
        assert!(matches!(err, FtpError::OutputExists(_)));
        assert!(err.to_string().contains("Use --force to overwrite"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn test_sink_force_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old content that is long").unwrap();

        let mut sink = OutputSink::open(&config_for(path.clone(), true)).unwrap();
        sink.write_all(b"new").unwrap();
        sink.flush().unwrap();
        drop(sink);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_sink_unopenable_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let err = OutputSink::open(&config_for(path, false))
            .err()
            .expect("missing parent should fail");
        assert!(matches!(err, FtpError::OutputOpen { .. }));
    }
}
