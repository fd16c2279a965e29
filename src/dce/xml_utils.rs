use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;
use std::io::Cursor;

use crate::core::DfeError;

fn xml_io(e: std::io::Error) -> DfeError {
    DfeError::Xml(format!("XML write error: {e}"))
}

/// Thin wrapper over [`quick_xml::Writer`] producing compact output.
///
/// The authority schemas reject insignificant whitespace between elements, so
/// unlike pretty-printed invoice XML this writer never indents. Text content
/// is escaped by quick-xml on write (all five XML metacharacters).
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, DfeError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    /// A writer without the leading XML declaration, for fragments that are
    /// embedded (base64 or otherwise) in an outer document.
    pub fn fragment() -> Self {
        Self {
            writer: Writer::new(Cursor::new(Vec::new())),
        }
    }

    pub fn into_string(self) -> Result<String, DfeError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| DfeError::Xml(format!("XML UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, DfeError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, DfeError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, DfeError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, DfeError> {
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write a text element only when the value is present and non-blank.
    /// Optional elements are omitted entirely, never emitted empty.
    pub fn opt_text_element(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<&mut Self, DfeError> {
        match text {
            Some(t) if !t.trim().is_empty() => self.text_element(name, t),
            _ => Ok(self),
        }
    }

    /// Write a decimal with a fixed number of fraction digits.
    pub fn decimal_element(
        &mut self,
        name: &str,
        value: Decimal,
        casas: u32,
    ) -> Result<&mut Self, DfeError> {
        self.text_element(name, &format_decimal(value, casas))
    }
}

/// Format a [`Decimal`] with exactly `casas` fraction digits.
///
/// Always `.` as the decimal separator, never scientific notation, trailing
/// zeros kept — `10` with 2 places renders as `10.00`. Midpoints round away
/// from zero, matching the authority's reference formatting.
pub fn format_decimal(value: Decimal, casas: u32) -> String {
    let rounded = value.round_dp_with_strategy(casas, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", casas as usize, rounded)
}
