//! XML error types and S3 error body formatting.

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};
use s3sign_model::S3Error;

/// Errors that can occur while reading or writing S3 XML.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// A required XML element was missing.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// An unexpected XML element was encountered.
    #[error("unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// An error parsing a value from XML text content.
    #[error("failed to parse value: {0}")]
    ParseError(String),

    /// The response carried no body at all.
    #[error("empty XML body")]
    EmptyBody,
}

/// Format an S3 error as XML.
///
/// Optional fields are written only when set.
///
/// # Example output
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <Error>
///   <Code>NoSuchBucket</Code>
///   <Message>The specified bucket does not exist</Message>
///   <Resource>/mybucket</Resource>
///   <RequestId>tx00000...</RequestId>
/// </Error>
/// ```
#[must_use]
pub fn error_to_xml(error: &S3Error) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);
    if let Err(e) = write_error_xml(&mut buf, error) {
        tracing::error!(error = %e, "failed to serialize S3 error XML");
        buf.clear();
    }
    buf
}

fn write_error_xml(buf: &mut Vec<u8>, error: &S3Error) -> io::Result<()> {
    let mut writer = Writer::new(buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer.create_element("Error").write_inner_content(|w| {
        w.create_element("Code")
            .write_text_content(BytesText::new(error.code.as_str()))?;
        w.create_element("Message")
            .write_text_content(BytesText::new(&error.message))?;
        let optional = [
            ("Resource", &error.resource),
            ("RequestId", &error.request_id),
            ("HostId", &error.host_id),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                w.create_element(name)
                    .write_text_content(BytesText::new(value))?;
            }
        }
        Ok(())
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use s3sign_model::S3ErrorCode;

    use super::*;

    #[test]
    fn test_should_format_error_with_resource() {
        let error = S3Error::new(S3ErrorCode::NoSuchBucket)
            .with_resource("/mybucket")
            .with_request_id("tx000001");
        let xml = error_to_xml(&error);
        let xml_str = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(xml_str.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml_str.contains("<Code>NoSuchBucket</Code>"));
        assert!(xml_str.contains("<RequestId>tx000001</RequestId>"));
        assert!(!xml_str.contains("<HostId>"));
    }

    #[test]
    fn test_should_escape_special_characters() {
        let error = S3Error::with_message(
            S3ErrorCode::InvalidArgument,
            "Value must be < 1024 & > 0",
        )
        .with_resource("/my&bucket");
        let xml = error_to_xml(&error);
        let xml_str = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(xml_str.contains("Value must be &lt; 1024 &amp; &gt; 0"));
        assert!(xml_str.contains("/my&amp;bucket"));
    }
}
