use crate::error::PosterResult;
use crate::models::{Series, TimeSeriesPoint};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XML_PROLOG: &str = "<?xml version=\"1.0\" standalone=\"no\"?>\r\n";

// Characters `encodeURIComponent` leaves as-is.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Parse the JSON array of monthly records.
pub fn parse_series(json: &str) -> PosterResult<Series> {
    let points: Vec<TimeSeriesPoint> = serde_json::from_str(json)?;
    Ok(Series::from_points(points))
}

/// Read and parse the series file in one go.
pub fn load_series<P: AsRef<Path>>(path: P) -> PosterResult<Series> {
    let raw = fs::read_to_string(path)?;
    parse_series(&raw)
}

/// Make the SVG standalone: namespace on the root element and an XML prolog.
pub fn finalize_svg(svg: &str) -> String {
    let mut source = svg.trim_start();
    if source.starts_with("<?xml")
        && let Some(end) = source.find("?>")
    {
        source = source[end + 2..].trim_start();
    }
    let opening = source.split('>').next().unwrap_or_default();
    let body = if source.starts_with("<svg") && !opening.contains(&format!("xmlns=\"{SVG_NS}\"")) {
        source.replacen("<svg", &format!("<svg xmlns=\"{SVG_NS}\""), 1)
    } else {
        source.to_string()
    };
    format!("{XML_PROLOG}{body}")
}

/// Write the finalized SVG document.
pub fn save_svg<P: AsRef<Path>>(svg: &str, path: P) -> PosterResult<()> {
    let mut f = File::create(path)?;
    f.write_all(finalize_svg(svg).as_bytes())?;
    Ok(())
}

/// `data:` URL carrying the finalized SVG, suitable for a download link.
pub fn svg_data_url(svg: &str) -> String {
    let doc = finalize_svg(svg);
    format!(
        "data:image/svg+xml;charset=utf-8,{}",
        percent_encoding::utf8_percent_encode(&doc, URI_COMPONENT)
    )
}

/// Save any serializable value as pretty JSON.
pub fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> PosterResult<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
