/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Hypervisor configuration document (`xm_cf.*.xml`) rewrite.
//!
//! The document is an XtratuM-style configuration:
//!
//! ```text
//! <SystemDescription xmlns="http://www.xtratum.org/xm-arm-2.x">
//!   <HwDescription>                      ← first child of the root
//!     <ProcessorTable>
//!       <Processor id="0" frequency="400Mhz">
//!         <CyclicPlanTable>
//!           <Plan id="0" majorFrame="700ms">
//!             <Slot id="0" start="0ms" duration="100ms" partitionId="1"/>
//! ```
//!
//! [`ConfigDocument::replace_processors`] streams the document once with
//! `quick-xml`, copying every event except the `Processor` elements of the
//! `ProcessorTable`, and inserts one freshly generated `Processor` per planned
//! processor.  Element names are matched by local name, so prefixed and
//! default-namespace documents are handled alike; generated elements carry no
//! prefix and inherit the default namespace.
//!
//! Nothing touches the file until [`ConfigDocument::save`]: a failed run
//! leaves the document on disk exactly as it was.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;
use tracing::{debug, info};

use crate::plan::{CyclicPlan, ProcessorPlan};

const PROCESSOR_TABLE: &[u8] = b"ProcessorTable";
const PROCESSOR: &[u8] = b"Processor";

/// Element depth of the hardware description (root is 1).
const HW_DEPTH: usize = 2;
/// Element depth of the `ProcessorTable`.
const TABLE_DEPTH: usize = 3;

const DEFAULT_INDENT_UNIT: &str = "    ";

#[derive(Debug, Error)]
pub enum DocumentError {
    /// Parse failure, no root element, or a root without a hardware
    /// description child.
    #[error("malformed configuration document {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("cannot access configuration document {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── ConfigDocument ────────────────────────────────────────────────────────────

/// An opened configuration document held in memory.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: PathBuf,
    content: String,
}

impl ConfigDocument {
    /// Read and structurally check `path`.
    ///
    /// # Errors
    /// * [`DocumentError::Io`] – the file cannot be read.
    /// * [`DocumentError::Malformed`] – not well-formed XML, or the root has
    ///   no child element.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path).map_err(|source| DocumentError::Io {
            path: path.clone(),
            source,
        })?;
        let doc = Self::from_string(path, content)?;
        info!(path = %doc.path.display(), "configuration document opened");
        Ok(doc)
    }

    /// Wrap already loaded content; `path` is where [`save`](Self::save) writes.
    pub fn from_string(path: impl Into<PathBuf>, content: impl Into<String>) -> Result<Self, DocumentError> {
        let doc = Self {
            path: path.into(),
            content: content.into(),
        };
        doc.check_structure()?;
        Ok(doc)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current (possibly rewritten, not yet saved) document text.
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Replace every `Processor` of the `ProcessorTable` with the processors of
    /// `plan`.
    ///
    /// The `ProcessorTable` is searched among the children of the first child
    /// of the root and created at its end if absent.
    pub fn replace_processors(&mut self, plan: &CyclicPlan) -> Result<(), DocumentError> {
        self.content = self.render(plan)?;
        info!(
            path = %self.path.display(),
            processors = plan.processors.len(),
            "processor table rewritten"
        );
        Ok(())
    }

    /// Write the document back to its path.
    pub fn save(&self) -> Result<(), DocumentError> {
        fs::write(&self.path, &self.content).map_err(|source| DocumentError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "configuration document saved");
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn malformed(&self, reason: impl Display) -> DocumentError {
        DocumentError::Malformed {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    fn check_structure(&self) -> Result<(), DocumentError> {
        let mut reader = Reader::from_str(&self.content);
        let mut depth = 0usize;
        let mut root_seen = false;
        let mut hw_seen = false;

        loop {
            let event = reader.read_event().map_err(|e| {
                self.malformed(format!("at byte {}: {e}", reader.buffer_position()))
            })?;
            match event {
                Event::Start(_) => {
                    depth += 1;
                    root_seen = true;
                    hw_seen |= depth == HW_DEPTH;
                }
                Event::Empty(_) => {
                    root_seen = true;
                    hw_seen |= depth + 1 == HW_DEPTH;
                }
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Eof => break,
                _ => {}
            }
        }

        if !root_seen {
            return Err(self.malformed("no root element"));
        }
        if depth != 0 {
            return Err(self.malformed("unexpected end of document"));
        }
        if !hw_seen {
            return Err(self.malformed("root element has no hardware description child"));
        }
        Ok(())
    }

    fn render(&self, plan: &CyclicPlan) -> Result<String, DocumentError> {
        let mut reader = Reader::from_str(&self.content);
        let mut out = Emitter::new(plan);

        loop {
            let event = reader.read_event().map_err(|e| {
                self.malformed(format!("at byte {}: {e}", reader.buffer_position()))
            })?;
            if matches!(event, Event::Eof) {
                break;
            }
            out.handle(event).map_err(|e| self.malformed(e))?;
        }

        if !out.table_written {
            return Err(self.malformed("root element has no hardware description child"));
        }
        String::from_utf8(out.writer.into_inner()).map_err(|e| self.malformed(e))
    }
}

// ── Streaming rewrite ─────────────────────────────────────────────────────────

/// Event-by-event copy of the document with the processor table swapped out.
struct Emitter<'p> {
    plan: &'p CyclicPlan,
    writer: Writer<Vec<u8>>,
    depth: usize,
    /// Depth of the open `Processor` subtree being dropped, 0 when copying.
    skip: usize,
    hw_seen: bool,
    in_hw: bool,
    in_table: bool,
    table_written: bool,
    /// Indentation preceding the most recent tag.
    indent: String,
    hw_indent: String,
    table_indent: String,
}

impl<'p> Emitter<'p> {
    fn new(plan: &'p CyclicPlan) -> Self {
        Self {
            plan,
            writer: Writer::new(Vec::new()),
            depth: 0,
            skip: 0,
            hw_seen: false,
            in_hw: false,
            in_table: false,
            table_written: false,
            indent: String::new(),
            hw_indent: String::new(),
            table_indent: String::new(),
        }
    }

    fn handle(&mut self, event: Event<'_>) -> quick_xml::Result<()> {
        if self.skip > 0 {
            match event {
                Event::Start(_) => self.skip += 1,
                Event::End(_) => self.skip -= 1,
                _ => {}
            }
            return Ok(());
        }

        let at_table_level = self.in_table && self.depth == TABLE_DEPTH;

        match event {
            Event::Start(e) => {
                if at_table_level && e.local_name().as_ref() == PROCESSOR {
                    debug!("dropping existing Processor element");
                    self.skip = 1;
                    return Ok(());
                }
                if at_table_level {
                    self.newline(&self.child_indent())?;
                }
                self.depth += 1;
                self.enter(&e);
                self.writer.write_event(Event::Start(e))
            }
            Event::Empty(e) => {
                if at_table_level && e.local_name().as_ref() == PROCESSOR {
                    debug!("dropping existing Processor element");
                    return Ok(());
                }
                if at_table_level {
                    self.newline(&self.child_indent())?;
                }
                let depth = self.depth + 1;
                if depth == HW_DEPTH && !self.hw_seen {
                    // <HwDescription/> → <HwDescription><ProcessorTable>…</ProcessorTable></HwDescription>
                    self.hw_seen = true;
                    self.hw_indent = self.indent.clone();
                    self.writer.write_event(Event::Start(e.borrow()))?;
                    self.write_new_table()?;
                    return self.writer.write_event(Event::End(e.to_end()));
                }
                if depth == TABLE_DEPTH && self.in_hw && !self.table_written && is_table(&e) {
                    self.table_indent = self.indent.clone();
                    self.writer.write_event(Event::Start(e.borrow()))?;
                    self.write_processors(&self.child_indent())?;
                    self.newline(&self.table_indent.clone())?;
                    self.table_written = true;
                    return self.writer.write_event(Event::End(e.to_end()));
                }
                self.writer.write_event(Event::Empty(e))
            }
            Event::End(e) => {
                if self.in_table && self.depth == TABLE_DEPTH {
                    self.write_processors(&self.child_indent())?;
                    self.newline(&self.table_indent.clone())?;
                    self.in_table = false;
                    self.table_written = true;
                } else if self.in_hw && self.depth == HW_DEPTH {
                    if !self.table_written {
                        self.write_new_table()?;
                    }
                    self.in_hw = false;
                }
                self.depth = self.depth.saturating_sub(1);
                self.writer.write_event(Event::End(e))
            }
            Event::Text(t) => {
                let text = String::from_utf8_lossy(&t).into_owned();
                let blank = text.trim().is_empty();
                if blank {
                    if let Some(pos) = text.rfind('\n') {
                        self.indent = text[pos + 1..].to_string();
                    }
                }
                if at_table_level && blank {
                    return Ok(());
                }
                self.writer.write_event(Event::Text(t))
            }
            other => {
                if at_table_level {
                    self.newline(&self.child_indent())?;
                }
                self.writer.write_event(other)
            }
        }
    }

    /// Track the hardware description and processor table on a start tag.
    fn enter(&mut self, e: &BytesStart<'_>) {
        if self.depth == HW_DEPTH && !self.hw_seen {
            self.hw_seen = true;
            self.in_hw = true;
            self.hw_indent = self.indent.clone();
        } else if self.depth == TABLE_DEPTH && self.in_hw && !self.table_written && is_table(e) {
            self.in_table = true;
            self.table_indent = self.indent.clone();
        }
    }

    fn unit(&self) -> String {
        let unit = self
            .table_indent
            .strip_prefix(self.hw_indent.as_str())
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_INDENT_UNIT);
        unit.to_string()
    }

    fn child_indent(&self) -> String {
        format!("{}{}", self.table_indent, self.unit())
    }

    fn newline(&mut self, indent: &str) -> quick_xml::Result<()> {
        self.writer
            .write_event(Event::Text(BytesText::new(&format!("\n{indent}"))))
    }

    /// Append a `ProcessorTable` at the end of the hardware description.
    fn write_new_table(&mut self) -> quick_xml::Result<()> {
        let unit = DEFAULT_INDENT_UNIT;
        self.table_indent = format!("{}{unit}", self.hw_indent);
        let table_indent = self.table_indent.clone();

        self.newline(&table_indent)?;
        self.writer
            .write_event(Event::Start(BytesStart::new("ProcessorTable")))?;
        self.write_processors(&format!("{table_indent}{unit}"))?;
        self.newline(&table_indent)?;
        self.writer
            .write_event(Event::End(BytesEnd::new("ProcessorTable")))?;
        self.newline(&self.hw_indent.clone())?;
        self.table_written = true;
        debug!("ProcessorTable created");
        Ok(())
    }

    fn write_processors(&mut self, indent: &str) -> quick_xml::Result<()> {
        let unit = self.unit();
        let plan = self.plan;
        for cpu in &plan.processors {
            write_processor(&mut self.writer, cpu, plan.frequency_mhz, indent, &unit)?;
        }
        Ok(())
    }
}

fn is_table(e: &BytesStart<'_>) -> bool {
    e.local_name().as_ref() == PROCESSOR_TABLE
}

/// `Processor/CyclicPlanTable/Plan/Slot*` for one processor.
fn write_processor(
    writer: &mut Writer<Vec<u8>>,
    cpu: &ProcessorPlan,
    frequency_mhz: u32,
    indent: &str,
    unit: &str,
) -> quick_xml::Result<()> {
    let line = |level: usize| Event::Text(BytesText::from_escaped(format!("\n{indent}{}", unit.repeat(level))));

    let id = cpu.processor.to_string();
    let frequency = format!("{frequency_mhz}Mhz");
    let mut processor = BytesStart::new("Processor");
    processor.push_attribute(("id", id.as_str()));
    processor.push_attribute(("frequency", frequency.as_str()));

    let major_frame = format!("{}ms", cpu.major_frame_ms);
    let mut plan = BytesStart::new("Plan");
    plan.push_attribute(("id", "0"));
    plan.push_attribute(("majorFrame", major_frame.as_str()));

    writer.write_event(line(0))?;
    writer.write_event(Event::Start(processor))?;
    writer.write_event(line(1))?;
    writer.write_event(Event::Start(BytesStart::new("CyclicPlanTable")))?;
    writer.write_event(line(2))?;

    if cpu.slots.is_empty() {
        writer.write_event(Event::Empty(plan))?;
    } else {
        writer.write_event(Event::Start(plan))?;
        for slot in &cpu.slots {
            let id = slot.id.to_string();
            let start = format!("{}ms", slot.start_ms);
            let duration = format!("{}ms", slot.duration_ms);
            let partition = slot.partition_id.to_string();
            let mut e = BytesStart::new("Slot");
            e.push_attribute(("id", id.as_str()));
            e.push_attribute(("start", start.as_str()));
            e.push_attribute(("duration", duration.as_str()));
            e.push_attribute(("partitionId", partition.as_str()));
            writer.write_event(line(3))?;
            writer.write_event(Event::Empty(e))?;
        }
        writer.write_event(line(2))?;
        writer.write_event(Event::End(BytesEnd::new("Plan")))?;
    }

    writer.write_event(line(1))?;
    writer.write_event(Event::End(BytesEnd::new("CyclicPlanTable")))?;
    writer.write_event(line(0))?;
    writer.write_event(Event::End(BytesEnd::new("Processor")))?;

    debug!(
        processor = cpu.processor,
        slots = cpu.slots.len(),
        major_frame_ms = cpu.major_frame_ms,
        "Processor element written"
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::LaunchTable;
    use std::collections::BTreeMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<SystemDescription xmlns="http://www.xtratum.org/xm-arm-2.x" name="demo" version="1.0.0">
    <HwDescription>
        <ProcessorTable>
            <Processor id="0" frequency="50Mhz">
                <CyclicPlanTable>
                    <Plan id="0" majorFrame="1000ms">
                        <Slot id="0" start="0ms" duration="500ms" partitionId="0"/>
                    </Plan>
                </CyclicPlanTable>
            </Processor>
            <Processor id="1" frequency="50Mhz"/>
        </ProcessorTable>
        <MemoryLayout>
            <Region type="ram" start="0x0" size="64MB"/>
        </MemoryLayout>
    </HwDescription>
    <PartitionTable>
        <Partition id="0" name="p0"/>
    </PartitionTable>
</SystemDescription>
"#;

    // ── Test helpers ──────────────────────────────────────────────────────────

    fn table(entries: &[i64]) -> LaunchTable {
        entries
            .iter()
            .map(|&e| if e < 0 { None } else { Some(e as u32) })
            .collect::<Vec<_>>()
            .into()
    }

    fn plan(tables: &[&[i64]]) -> CyclicPlan {
        CyclicPlan {
            processors: tables
                .iter()
                .enumerate()
                .map(|(cpu, t)| ProcessorPlan::new(cpu, vec![], table(t), 100))
                .collect(),
            slice_ms: 100,
            frequency_mhz: 400,
        }
    }

    /// Attributes of every element with local name `name`, in document order.
    fn elements(xml: &str, name: &str) -> Vec<BTreeMap<String, String>> {
        let mut reader = Reader::from_str(xml);
        let mut found = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == name.as_bytes() => {
                    let attrs = e
                        .attributes()
                        .map(|a| {
                            let a = a.unwrap();
                            (
                                String::from_utf8(a.key.as_ref().to_vec()).unwrap(),
                                a.unescape_value().unwrap().into_owned(),
                            )
                        })
                        .collect();
                    found.push(attrs);
                }
                Event::Eof => break,
                _ => {}
            }
        }
        found
    }

    fn attr<'a>(e: &'a BTreeMap<String, String>, key: &str) -> &'a str {
        e.get(key).map(String::as_str).unwrap_or("")
    }

    fn rewrite(xml: &str, plan: &CyclicPlan) -> String {
        let mut doc = ConfigDocument::from_string("xm_cf.xml", xml).unwrap();
        doc.replace_processors(plan).unwrap();
        doc.as_str().to_string()
    }

    // ── replace_processors ────────────────────────────────────────────────────

    #[test]
    fn processors_are_replaced_with_the_plan() {
        let out = rewrite(SAMPLE, &plan(&[&[1, 0, -1, 1, -1, -1, -1]]));

        let processors = elements(&out, "Processor");
        assert_eq!(processors.len(), 1);
        assert_eq!(attr(&processors[0], "id"), "0");
        assert_eq!(attr(&processors[0], "frequency"), "400Mhz");

        let plans = elements(&out, "Plan");
        assert_eq!(plans.len(), 1);
        assert_eq!(attr(&plans[0], "id"), "0");
        assert_eq!(attr(&plans[0], "majorFrame"), "700ms");

        let slot_elements = elements(&out, "Slot");
        let slots: Vec<(&str, &str, &str, &str)> = slot_elements
            .iter()
            .map(|s| (attr(s, "id"), attr(s, "start"), attr(s, "duration"), attr(s, "partitionId")))
            .collect();
        assert_eq!(
            slots,
            vec![
                ("0", "0ms", "100ms", "1"),
                ("1", "100ms", "100ms", "0"),
                ("2", "300ms", "100ms", "1"),
            ]
        );
    }

    #[test]
    fn unrelated_content_is_preserved() {
        let out = rewrite(SAMPLE, &plan(&[&[0]]));
        assert!(out.starts_with("<?xml version=\"1.0\"?>"));
        assert_eq!(elements(&out, "Region").len(), 1);
        assert_eq!(attr(&elements(&out, "Partition")[0], "name"), "p0");
        assert_eq!(
            attr(&elements(&out, "SystemDescription")[0], "xmlns"),
            "http://www.xtratum.org/xm-arm-2.x"
        );
        assert!(!out.contains("50Mhz"));
    }

    #[test]
    fn output_follows_document_indentation() {
        let out = rewrite(SAMPLE, &plan(&[&[0]]));
        assert!(out.contains(
            "\n        <ProcessorTable>\n            <Processor id=\"0\" frequency=\"400Mhz\">\n                <CyclicPlanTable>"
        ));
        assert!(out.contains("</Processor>\n        </ProcessorTable>\n        <MemoryLayout>"));
    }

    #[test]
    fn one_processor_element_per_cpu() {
        let out = rewrite(SAMPLE, &plan(&[&[0, 0, -1], &[1, -1], &[]]));
        let ids: Vec<String> = elements(&out, "Processor")
            .iter()
            .map(|p| attr(p, "id").to_string())
            .collect();
        assert_eq!(ids, vec!["0", "1", "2"]);

        let frames: Vec<String> = elements(&out, "Plan")
            .iter()
            .map(|p| attr(p, "majorFrame").to_string())
            .collect();
        assert_eq!(frames, vec!["300ms", "200ms", "0ms"]);

        // slot ids restart on every processor
        let slot_ids: Vec<String> = elements(&out, "Slot")
            .iter()
            .map(|s| attr(s, "id").to_string())
            .collect();
        assert_eq!(slot_ids, vec!["0", "0"]);
    }

    #[test]
    fn rewritten_document_is_well_formed_and_idempotent() {
        let p = plan(&[&[1, 0, -1, 1]]);
        let once = rewrite(SAMPLE, &p);
        let twice = rewrite(&once, &p);
        assert_eq!(once, twice);
    }

    #[test]
    fn prefixed_processors_are_matched_by_local_name() {
        let xml = r#"<xm:SystemDescription xmlns:xm="http://www.xtratum.org/xm-arm-2.x">
  <xm:HwDescription>
    <xm:ProcessorTable>
      <xm:Processor id="7" frequency="1Mhz"/>
    </xm:ProcessorTable>
  </xm:HwDescription>
</xm:SystemDescription>"#;
        let out = rewrite(xml, &plan(&[&[0]]));
        let processors = elements(&out, "Processor");
        assert_eq!(processors.len(), 1);
        assert_eq!(attr(&processors[0], "id"), "0");
        assert!(out.contains("</xm:ProcessorTable>"));
    }

    #[test]
    fn missing_processor_table_is_created() {
        let xml = "<Root>\n  <Hw>\n    <Memory/>\n  </Hw>\n</Root>\n";
        let out = rewrite(xml, &plan(&[&[0]]));
        assert_eq!(elements(&out, "ProcessorTable").len(), 1);
        assert_eq!(elements(&out, "Processor").len(), 1);
        assert_eq!(elements(&out, "Memory").len(), 1);
        ConfigDocument::from_string("x.xml", out).unwrap();
    }

    #[test]
    fn empty_processor_table_is_filled() {
        let out = rewrite("<Root><Hw><ProcessorTable/></Hw></Root>", &plan(&[&[0]]));
        assert_eq!(elements(&out, "ProcessorTable").len(), 1);
        assert_eq!(elements(&out, "Processor").len(), 1);
    }

    #[test]
    fn empty_hardware_description_gets_a_table() {
        let out = rewrite("<Root><Hw/><Other/></Root>", &plan(&[&[0]]));
        assert_eq!(elements(&out, "Processor").len(), 1);
        assert!(out.contains("</Hw><Other/>"));
    }

    #[test]
    fn only_the_first_child_of_the_root_is_the_hardware_description() {
        let xml = "<Root><Hw/><Resident><ProcessorTable><Processor id=\"9\"/></ProcessorTable></Resident></Root>";
        let out = rewrite(xml, &plan(&[&[0]]));
        let ids: Vec<String> = elements(&out, "Processor")
            .iter()
            .map(|p| attr(p, "id").to_string())
            .collect();
        assert_eq!(ids, vec!["0", "9"]);
    }

    #[test]
    fn processor_without_slots_gets_an_empty_plan() {
        let out = rewrite(SAMPLE, &plan(&[&[-1, -1]]));
        assert!(out.contains("<Plan id=\"0\" majorFrame=\"200ms\"/>"));
        assert!(elements(&out, "Slot").is_empty());
    }

    // ── malformed documents ───────────────────────────────────────────────────

    fn is_malformed(xml: &str) -> bool {
        matches!(
            ConfigDocument::from_string("bad.xml", xml),
            Err(DocumentError::Malformed { .. })
        )
    }

    #[test]
    fn mismatched_tags_are_malformed() {
        assert!(is_malformed("<Root><Hw></Root></Hw>"));
    }

    #[test]
    fn missing_root_is_malformed() {
        assert!(is_malformed(""));
        assert!(is_malformed("just text"));
    }

    #[test]
    fn root_without_children_is_malformed() {
        assert!(is_malformed("<Root/>"));
        assert!(is_malformed("<Root>text only</Root>"));
    }

    #[test]
    fn truncated_document_is_malformed() {
        assert!(is_malformed("<Root><Hw>"));
    }

    // ── open / save ───────────────────────────────────────────────────────────

    #[test]
    fn missing_file_is_io_error() {
        let err = ConfigDocument::open("/nonexistent/xm_cf.xml").unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }

    #[test]
    fn save_writes_the_rewritten_document() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(SAMPLE.as_bytes()).unwrap();

        let mut doc = ConfigDocument::open(f.path()).unwrap();
        assert_eq!(doc.path(), f.path());
        doc.replace_processors(&plan(&[&[0, 1]])).unwrap();
        // nothing on disk changes before save()
        assert_eq!(std::fs::read_to_string(f.path()).unwrap(), SAMPLE);

        doc.save().unwrap();
        let on_disk = std::fs::read_to_string(f.path()).unwrap();
        assert_eq!(on_disk, doc.as_str());
        assert_eq!(elements(&on_disk, "Slot").len(), 2);
    }
}
