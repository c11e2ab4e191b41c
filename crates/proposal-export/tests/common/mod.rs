//! Shared fixtures for the integration tests

use lopdf::{Dictionary, Document, Object, Stream};
use proposal_export::*;
use std::sync::Mutex;
use std::time::Duration;

/// Build a PDF whose pages are told apart by MediaBox width
pub fn create_test_pdf(widths: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for &width in widths {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(842),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(widths.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

/// Serves canned segments, answering later pages first
pub struct MockBackend {
    pub segments: Vec<Vec<u8>>,
    pub fail_page: Option<usize>,
    pub seen: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new(segments: Vec<Vec<u8>>) -> Self {
        Self {
            segments,
            fail_page: None,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl ExportBackend for MockBackend {
    async fn fetch(&self, request: &ExportRequest) -> Result<Vec<u8>> {
        self.seen.lock().unwrap().push(request.label());
        match request.kind {
            RequestKind::Tabular => Ok(b"tabular-bytes".to_vec()),
            RequestKind::PageRange { page } => {
                let delay = (self.segments.len() + 1 - page) as u64 * 15;
                tokio::time::sleep(Duration::from_millis(delay)).await;
                if self.fail_page == Some(page) {
                    return Err(ExportError::Fetch {
                        label: request.label(),
                        message: "HTTP 500".to_string(),
                    });
                }
                Ok(self.segments[page - 1].clone())
            }
        }
    }
}
