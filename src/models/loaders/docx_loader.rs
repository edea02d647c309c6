use crate::error::InputError;
use crate::models::ExampleResume;
use std::path::Path;
use tokio::fs;

/// 从 docx 中读出的一个段落
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphInfo {
    pub text: String,
    /// 段落样式 ID，例如 `Heading1`
    pub style: Option<String>,
    /// 是否属于编号 / 项目符号列表
    pub is_list: bool,
}

/// 读取示例简历，文件不存在时返回 `None`
pub async fn load_example_resume(path: &Path) -> Result<Option<ExampleResume>, InputError> {
    let path_str = path.display().to_string();

    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("未找到示例简历 {}，跳过格式参考", path_str);
            return Ok(None);
        }
        Err(e) => return Err(InputError::read(path_str, e)),
    };

    let text = read_paragraphs(&bytes)
        .map_err(|e| InputError::Read {
            path: path_str.clone(),
            source: e.to_string().into(),
        })?
        .into_iter()
        .map(|p| p.text)
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.trim().to_string())
        .collect::<Vec<_>>()
        .join("\n");

    if text.is_empty() {
        tracing::warn!("示例简历 {} 没有文字内容，跳过格式参考", path_str);
        return Ok(None);
    }

    tracing::info!("已读取示例简历: {}", path_str);
    Ok(Some(ExampleResume { text }))
}

/// 解析 docx 字节流，按顺序返回所有段落
pub fn read_paragraphs(bytes: &[u8]) -> Result<Vec<ParagraphInfo>, docx_rs::ReaderError> {
    let docx = docx_rs::read_docx(bytes)?;

    let paragraphs = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(para) => Some(ParagraphInfo {
                text: paragraph_text(para),
                style: para.property.style.as_ref().map(|s| s.val.clone()),
                is_list: para.property.numbering_property.is_some(),
            }),
            _ => None,
        })
        .collect();

    Ok(paragraphs)
}

/// 拼接段落中所有 run 的文本
pub fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let docx_rs::RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    fn build_docx(lines: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for line in lines {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*line)));
        }
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn test_absent_example_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_example_resume(&dir.path().join("example.docx"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_example_text_skips_blank_paragraphs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.docx");
        std::fs::write(&path, build_docx(&["Professional Profile", "  ", "Seasoned analyst"]))
            .unwrap();

        let example = load_example_resume(&path).await.unwrap().unwrap();
        assert_eq!(example.text, "Professional Profile\nSeasoned analyst");
    }

    #[tokio::test]
    async fn test_corrupt_example_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.docx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        let err = load_example_resume(&path).await.unwrap_err();
        assert!(matches!(err, InputError::Read { .. }));
    }
}
