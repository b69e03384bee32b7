//! HTML 解析与序列化

use encoding_rs::Encoding;
use html5ever::parse_document;
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{RcDom, SerializableHandle};

/// 将 HTML 字节转换为 DOM
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> RcDom {
    let s: String = if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        string.to_string()
    } else {
        String::from_utf8_lossy(data).to_string()
    };

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
        .unwrap()
}

/// 序列化文档（测试与调试用）
pub fn serialize_document(dom: &RcDom) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();

    serialize(
        &mut buf,
        &SerializableHandle::from(dom.document.clone()),
        SerializeOpts::default(),
    )
    .expect("unable to serialize DOM into buffer");

    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_dom_roundtrip() {
        let dom = html_to_dom(b"<html><body><span>hi</span></body></html>", "utf-8");
        let out = String::from_utf8(serialize_document(&dom)).unwrap();
        assert!(out.contains("<span>hi</span>"));
    }

    #[test]
    fn test_unknown_encoding_falls_back_to_utf8() {
        let dom = html_to_dom(b"<html><body>ok</body></html>", "no-such-encoding");
        let out = String::from_utf8(serialize_document(&dom)).unwrap();
        assert!(out.contains("ok"));
    }
}
