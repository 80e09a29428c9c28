//! 测试辅助：生成最小 PDF、读取页面宽度

use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

/// 生成一个 PDF，每页宽度由 `widths` 给出（用来区分页面顺序）
pub fn write_sample_pdf(dir: &Path, name: &str, widths: &[i64]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = widths
        .iter()
        .map(|width| {
            let content_id = doc.add_object(Stream::new(dictionary! {}, b"BT ET".to_vec()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), (*width).into(), 842.into()],
                "Contents" => content_id,
            });
            page_id.into()
        })
        .collect();

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    finish(doc, pages_id, dir, name)
}

/// 生成一个单页 PDF，MediaBox 只定义在 Pages 节点上
pub fn write_inherited_pdf(dir: &Path, name: &str, width: i64) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => 1i64,
        "Kids" => vec![page_id.into()],
        "MediaBox" => vec![0.into(), 0.into(), width.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    finish(doc, pages_id, dir, name)
}

fn finish(mut doc: Document, pages_id: lopdf::ObjectId, dir: &Path, name: &str) -> PathBuf {
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    std::fs::write(&path, buffer).unwrap();
    path
}

/// 按页码顺序读取每页 MediaBox 的宽度
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}
