//! Document output.
//!
//! A renderer receives one `begin`, then each page plan in order, then
//! `finish`. [`DocumentSession`] owns that protocol: whatever happens between
//! `begin` and the last page, the sink is finished exactly once.

use std::io::{self, Write};

use serde::Serialize;
use tracing::{debug, warn};

use qc_layout::{HeaderLayout, PagePlan};

use crate::variant::ReportVariant;

/// Document-level data drawn once, before the first page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMeta {
    pub variant: ReportVariant,
    pub title: String,
    pub report_code: String,
    pub profile: String,
    pub record_count: usize,
    pub header: HeaderLayout,
    /// Month labels of the period columns, empty for variants without them.
    pub column_labels: Vec<String>,
}

/// A drawing backend for page plans.
pub trait DocumentSink {
    fn begin(&mut self, meta: &DocumentMeta) -> io::Result<()>;

    fn write_page(&mut self, page: &PagePlan) -> io::Result<()>;

    /// Flush and close the document. Called once, also after failures.
    fn finish(&mut self) -> io::Result<()>;
}

#[derive(Serialize)]
#[serde(tag = "instruction", rename_all = "snake_case")]
enum RenderInstruction<'a> {
    Begin(&'a DocumentMeta),
    Page(&'a PagePlan),
    Finish { pages: usize },
}

/// Writes one JSON object per line: `begin`, every `page`, then `finish`.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    pages: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pages: 0 }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, instruction: &RenderInstruction<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, instruction)?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write> DocumentSink for JsonLinesSink<W> {
    fn begin(&mut self, meta: &DocumentMeta) -> io::Result<()> {
        self.emit(&RenderInstruction::Begin(meta))
    }

    fn write_page(&mut self, page: &PagePlan) -> io::Result<()> {
        self.pages += 1;
        self.emit(&RenderInstruction::Page(page))
    }

    fn finish(&mut self) -> io::Result<()> {
        let pages = self.pages;
        self.emit(&RenderInstruction::Finish { pages })?;
        self.writer.flush()
    }
}

/// Keeps everything in memory. Used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct PageCollector {
    pub meta: Option<DocumentMeta>,
    pub pages: Vec<PagePlan>,
    pub finished: bool,
}

impl DocumentSink for PageCollector {
    fn begin(&mut self, meta: &DocumentMeta) -> io::Result<()> {
        self.meta = Some(meta.clone());
        Ok(())
    }

    fn write_page(&mut self, page: &PagePlan) -> io::Result<()> {
        self.pages.push(page.clone());
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// An open document. Dropping it without [`finish`](Self::finish) still
/// finishes the sink; a failure there is logged, not returned.
pub struct DocumentSession<'a, S: DocumentSink + ?Sized> {
    sink: &'a mut S,
    pages: usize,
    finished: bool,
}

impl<'a, S: DocumentSink + ?Sized> DocumentSession<'a, S> {
    pub fn begin(sink: &'a mut S, meta: &DocumentMeta) -> io::Result<Self> {
        sink.begin(meta)?;
        Ok(Self {
            sink,
            pages: 0,
            finished: false,
        })
    }

    pub fn write_page(&mut self, page: &PagePlan) -> io::Result<()> {
        debug!(page = page.number, phase = %page.phase, rows = page.row_count(), "writing page");
        self.sink.write_page(page)?;
        self.pages += 1;
        Ok(())
    }

    /// Finish the document and return the number of pages written.
    pub fn finish(mut self) -> io::Result<usize> {
        self.finished = true;
        self.sink.finish()?;
        Ok(self.pages)
    }
}

impl<S: DocumentSink + ?Sized> Drop for DocumentSession<'_, S> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(error) = self.sink.finish() {
            warn!(%error, pages = self.pages, "failed to finish document");
        }
    }
}

#[cfg(test)]
mod tests {
    use qc_layout::{AdvanceMeasurer, layout_pages};
    use qc_model::{ColumnSpec, ReportProfile, Row};

    use super::*;

    fn meta() -> DocumentMeta {
        DocumentMeta {
            variant: ReportVariant::OutOfControl,
            title: ReportVariant::OutOfControl.title().to_string(),
            report_code: "R-1".to_string(),
            profile: "test".to_string(),
            record_count: 0,
            header: HeaderLayout::plain(&Default::default()),
            column_labels: Vec::new(),
        }
    }

    fn pages() -> Vec<PagePlan> {
        let profile = ReportProfile::new("test", vec![ColumnSpec::fixed(100.0); 2]);
        layout_pages(&profile, &AdvanceMeasurer::default(), vec![Row::blank(2); 3]).unwrap()
    }

    #[derive(Default)]
    struct FailingFinish {
        attempts: usize,
    }

    impl DocumentSink for FailingFinish {
        fn begin(&mut self, _meta: &DocumentMeta) -> io::Result<()> {
            Ok(())
        }

        fn write_page(&mut self, _page: &PagePlan) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }

        fn finish(&mut self) -> io::Result<()> {
            self.attempts += 1;
            Err(io::Error::other("disk full"))
        }
    }

    #[test]
    fn json_lines_frame_the_pages() {
        let mut sink = JsonLinesSink::new(Vec::new());
        let mut session = DocumentSession::begin(&mut sink, &meta()).unwrap();
        for page in &pages() {
            session.write_page(page).unwrap();
        }
        assert_eq!(session.finish().unwrap(), 1);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let kinds: Vec<String> = output
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["instruction"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(kinds, ["begin", "page", "finish"]);
        assert!(output.lines().last().unwrap().contains("\"pages\":1"));
    }

    #[test]
    fn dropping_a_session_finishes_the_sink() {
        let mut sink = PageCollector::default();
        {
            let mut session = DocumentSession::begin(&mut sink, &meta()).unwrap();
            session.write_page(&pages()[0]).unwrap();
        }
        assert!(sink.finished);
        assert_eq!(sink.pages.len(), 1);
    }

    #[test]
    fn finish_failures_on_drop_are_swallowed() {
        let mut sink = FailingFinish::default();
        {
            let mut session = DocumentSession::begin(&mut sink, &meta()).unwrap();
            assert!(session.write_page(&pages()[0]).is_err());
        }
        assert_eq!(sink.attempts, 1);
    }
}
