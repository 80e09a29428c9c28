//! PDF 合并器 - 基础设施层
//!
//! 只暴露"把两个 PDF 按顺序拼成一个"的能力，不认识候选人和编号。
//! 全部在内存中完成（证书通常只有几页），最后一次性写入目标文件并落盘。

use crate::error::MergeError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 页面可从父节点继承的属性
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// 向上查找父节点的最大层数
const MAX_TREE_DEPTH: usize = 32;

/// 文档合并能力
pub trait DocumentMerger: Send + Sync {
    /// 按 `first`、`second` 的顺序合并，写入 `destination`
    fn merge(&self, first: &Path, second: &Path, destination: &Path) -> Result<PathBuf, MergeError>;
}

/// 基于 lopdf 的合并器
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfMerger;

impl PdfMerger {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentMerger for PdfMerger {
    fn merge(&self, first: &Path, second: &Path, destination: &Path) -> Result<PathBuf, MergeError> {
        if destination == first || destination == second {
            return Err(MergeError::DestinationIsSource {
                path: destination.to_path_buf(),
            });
        }

        let documents = vec![load(first)?, load(second)?];
        let mut merged = concat(documents)?;

        let mut buffer = Vec::new();
        merged
            .save_to(&mut buffer)
            .map_err(|e| MergeError::SerializeFailed {
                reason: e.to_string(),
            })?;

        write_durably(destination, &buffer).map_err(|source| MergeError::WriteFailed {
            path: destination.to_path_buf(),
            source,
        })?;

        debug!(
            "已生成合并文件: {} ({} 字节)",
            destination.display(),
            buffer.len()
        );
        Ok(destination.to_path_buf())
    }
}

fn load(path: &Path) -> Result<Document, MergeError> {
    let bytes = std::fs::read(path).map_err(|source| MergeError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let document = Document::load_mem(&bytes).map_err(|e| MergeError::InvalidDocument {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if document.get_pages().is_empty() {
        return Err(MergeError::NoPages {
            path: path.to_path_buf(),
        });
    }
    Ok(document)
}

/// 拼接多个文档的页面，保持文档顺序和文档内页码顺序
fn concat(documents: Vec<Document>) -> Result<Document, MergeError> {
    let mut max_id = 1;
    let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut document in documents {
        document.renumber_objects_with(max_id);
        max_id = document.max_id + 1;

        for page_id in document.get_pages().into_values() {
            if let Some(page) = page_with_inherited(&document, page_id) {
                pages.push((page_id, page));
            }
        }
        objects.extend(document.objects);
    }

    let mut merged = Document::with_version("1.5");
    let mut catalog: Option<(ObjectId, Dictionary)> = None;
    let mut root_pages: Option<(ObjectId, Dictionary)> = None;

    for (object_id, object) in objects {
        match type_name(&object).as_deref() {
            Some(b"Catalog") => {
                if catalog.is_none() {
                    catalog = object.as_dict().ok().map(|d| (object_id, d.clone()));
                }
            }
            Some(b"Pages") => {
                if root_pages.is_none() {
                    root_pages = object.as_dict().ok().map(|d| (object_id, d.clone()));
                }
            }
            // 页面稍后重新挂接；书签引用旧页面，直接丢弃
            Some(b"Page") | Some(b"Outlines") | Some(b"Outline") => {}
            _ => {
                merged.objects.insert(object_id, object);
            }
        }
    }

    let (catalog_id, mut catalog) = catalog.ok_or(MergeError::MissingCatalog)?;
    let (pages_id, mut root) = root_pages.ok_or(MergeError::MissingCatalog)?;

    let kids: Vec<Object> = pages.iter().map(|(id, _)| Object::Reference(*id)).collect();
    root.set("Count", pages.len() as i64);
    root.set("Kids", kids);
    root.remove(b"Parent");
    merged.objects.insert(pages_id, Object::Dictionary(root));

    for (page_id, mut page) in pages {
        page.set("Parent", pages_id);
        merged.objects.insert(page_id, Object::Dictionary(page));
    }

    catalog.set("Pages", pages_id);
    catalog.remove(b"Outlines");
    merged.objects.insert(catalog_id, Object::Dictionary(catalog));

    merged.trailer.set("Root", catalog_id);
    merged.max_id = merged.objects.keys().map(|(id, _)| *id).max().unwrap_or(0);
    merged.renumber_objects();

    Ok(merged)
}

/// 复制页面字典，并补上从父节点继承的属性
fn page_with_inherited(document: &Document, page_id: ObjectId) -> Option<Dictionary> {
    let mut page = document.get_object(page_id).ok()?.as_dict().ok()?.clone();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(parent_id) = parent {
        if depth >= MAX_TREE_DEPTH {
            break;
        }
        let Some(node) = document
            .get_object(parent_id)
            .ok()
            .and_then(|o| o.as_dict().ok())
        else {
            break;
        };
        for key in INHERITABLE_KEYS {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    Some(page)
}

fn type_name(object: &Object) -> Option<Vec<u8>> {
    let dict = object.as_dict().ok()?;
    dict.get(b"Type")
        .and_then(Object::as_name)
        .ok()
        .map(<[u8]>::to_vec)
}

fn write_durably(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
