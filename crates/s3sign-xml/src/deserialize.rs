//! S3 XML deserialization: parsing S3 response bodies into Rust types.
//!
//! Only error bodies are parsed; success bodies are handed to the caller
//! unparsed.

use quick_xml::Reader;
use quick_xml::events::Event;
use s3sign_model::{S3Error, S3ErrorCode};
use tracing::{debug, warn};

use crate::error::XmlError;

/// Trait for deserializing S3 types from XML.
///
/// The root element has already been consumed by the caller; the implementation
/// reads child elements until the matching end tag.
pub trait S3Deserialize: Sized {
    /// Deserialize an instance from the given XML reader.
    ///
    /// The reader is positioned just after the opening tag of this element.
    /// The implementation should read all child content and return when
    /// the matching end tag is consumed.
    ///
    /// # Errors
    ///
    /// Returns `XmlError` if the XML is malformed or required fields are missing.
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError>;
}

/// Deserialize S3-compatible XML into a typed value.
///
/// Finds the root element and delegates to the type's `S3Deserialize` implementation.
///
/// # Errors
///
/// Returns `XmlError` if the XML is malformed or deserialization fails.
pub fn from_xml<T: S3Deserialize>(xml: &[u8]) -> Result<T, XmlError> {
    if xml.iter().all(u8::is_ascii_whitespace) {
        return Err(XmlError::EmptyBody);
    }

    // Text is trimmed per element in `read_text_content`; trimming each event
    // would eat the spaces around entity references.
    let mut reader = Reader::from_reader(xml);

    // Skip the XML declaration and find the root element.
    loop {
        match reader.read_event()? {
            Event::Start(_) => {
                return T::deserialize_xml(&mut reader);
            }
            Event::Eof => {
                return Err(XmlError::MissingElement("root element".to_owned()));
            }
            _ => {}
        }
    }
}

/// Parse an S3 `<Error>` body.
///
/// The status code of the result is the default for its error code; callers
/// that know the real response status should override it.
///
/// ```
/// use s3sign_model::S3ErrorCode;
/// use s3sign_xml::parse_error_response;
///
/// let body = b"<Error><Code>NoSuchKey</Code>\
///              <Message>The resource you requested does not exist</Message></Error>";
/// let error = parse_error_response(body).unwrap();
/// assert_eq!(error.code, S3ErrorCode::NoSuchKey);
/// assert_eq!(error.message, "The resource you requested does not exist");
/// ```
///
/// # Errors
///
/// Returns `XmlError` if the body is empty, malformed, or lacks a `<Code>`.
pub fn parse_error_response(body: &[u8]) -> Result<S3Error, XmlError> {
    let error: S3Error = from_xml(body)?;
    if error.code.is_other() {
        warn!(code = %error.code, "unrecognized S3 error code");
    } else {
        debug!(code = %error.code, "parsed S3 error response");
    }
    Ok(error)
}

impl S3Deserialize for S3Error {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut code = None;
        let mut message = None;
        let mut resource = None;
        let mut request_id = None;
        let mut host_id = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let tag_name = std::str::from_utf8(name.as_ref())
                        .map_err(|e| XmlError::ParseError(e.to_string()))?;
                    match tag_name {
                        "Code" => code = Some(read_text_content(reader)?),
                        "Message" => message = Some(read_text_content(reader)?),
                        "Resource" => resource = Some(read_text_content(reader)?),
                        "RequestId" => request_id = Some(read_text_content(reader)?),
                        "HostId" => host_id = Some(read_text_content(reader)?),
                        _ => skip_element(reader)?,
                    }
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(XmlError::UnexpectedElement(
                        "unexpected EOF in Error".to_owned(),
                    ));
                }
                _ => {}
            }
        }

        let code = code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| XmlError::MissingElement("Code".to_owned()))?;
        let code = S3ErrorCode::from_code(&code);
        let mut error = match message {
            Some(message) => S3Error::with_message(code, message),
            None => S3Error::new(code),
        };
        error.resource = resource.filter(|r| !r.is_empty());
        error.request_id = request_id.filter(|r| !r.is_empty());
        error.host_id = host_id.filter(|h| !h.is_empty());
        Ok(error)
    }
}

/// Read the text content of the current element and consume its end tag.
///
/// Expects the reader to be positioned right after a `Start` event.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::CData(e) => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::GeneralRef(e) => {
                if let Some(ch) = e
                    .resolve_char_ref()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?
                {
                    text.push(ch);
                } else {
                    let name = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    let resolved = quick_xml::escape::resolve_predefined_entity(&name)
                        .ok_or_else(|| XmlError::ParseError(format!("unknown entity: {name}")))?;
                    text.push_str(resolved);
                }
            }
            Event::End(_) => {
                return Ok(text.trim().to_owned());
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while reading text content".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

/// Skip over an element and all its children.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while skipping element".to_owned(),
                ));
            }
            _ => {}
        }
    }
}
