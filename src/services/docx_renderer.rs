//! 文档渲染 - 业务能力层
//!
//! 把 `StructuredResume` 写成 ATS 友好的 docx：
//! 标准字体、每个章节一个 `Heading1` 标题、列表项使用 Word 的项目符号编号。

use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph, Run, RunFonts, SpecialIndentType, Start, Style, StyleType,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::RenderError;
use crate::models::StructuredResume;

const FONT: &str = "Calibri";
/// docx 中字号单位为半磅
const BODY_SIZE: usize = 22;
const HEADING_SIZE: usize = 28;
const HEADING_STYLE: &str = "Heading1";
const BULLET_NUMBERING_ID: usize = 1;

/// 列表项前缀：`• `、`- `、`* `、`· `
static BULLET_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•·\-*]\s+").unwrap());
/// markdown 加粗标记
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*|__").unwrap());

/// 正文中的一行
#[derive(Debug, PartialEq, Eq)]
pub enum BodyLine {
    Bullet(String),
    Text(String),
}

/// 识别列表项并去掉 markdown 加粗标记
pub fn classify_line(line: &str) -> BodyLine {
    let line = line.trim();
    match BULLET_PREFIX.find(line) {
        Some(m) => BodyLine::Bullet(clean_text(&line[m.end()..])),
        None => BodyLine::Text(clean_text(line)),
    }
}

fn clean_text(text: &str) -> String {
    EMPHASIS.replace_all(text, "").trim().to_string()
}

/// docx 渲染器
#[derive(Debug, Default)]
pub struct DocxRenderer;

impl DocxRenderer {
    pub fn new() -> Self {
        Self
    }

    /// 生成 docx 字节流
    pub fn render(&self, resume: &StructuredResume) -> Result<Vec<u8>, RenderError> {
        let mut docx = base_document();

        for (section, body) in resume.sections() {
            debug!("渲染章节: {}", section);

            docx = docx.add_paragraph(
                Paragraph::new()
                    .style(HEADING_STYLE)
                    .add_run(Run::new().add_text(section.heading()).bold().size(HEADING_SIZE)),
            );

            for line in body.lines().filter(|l| !l.trim().is_empty()) {
                let paragraph = match classify_line(line) {
                    BodyLine::Bullet(text) => Paragraph::new()
                        .numbering(NumberingId::new(BULLET_NUMBERING_ID), IndentLevel::new(0))
                        .add_run(Run::new().add_text(text)),
                    BodyLine::Text(text) => Paragraph::new().add_run(Run::new().add_text(text)),
                };
                docx = docx.add_paragraph(paragraph);
            }

            // 章节之间留一个空段落
            docx = docx.add_paragraph(Paragraph::new());
        }

        let mut buf = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buf)
            .map_err(|e| RenderError::Build(e.to_string()))?;

        Ok(buf.into_inner())
    }

    /// 渲染并写入磁盘
    ///
    /// 先写入同目录下的临时文件再重命名，输出路径上不会出现写了一半的文件。
    pub async fn write(&self, resume: &StructuredResume, path: &Path) -> Result<(), RenderError> {
        let bytes = self.render(resume)?;
        let write_err = |source| RenderError::Write {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let tmp = temp_path(path);
        if let Err(e) = fs::write(&tmp, &bytes).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(write_err(e));
        }

        if let Err(e) = fs::rename(&tmp, path).await {
            warn!("重命名 {} 失败: {}", tmp.display(), e);
            let _ = fs::remove_file(&tmp).await;
            return Err(write_err(e));
        }

        debug!("已写入 {} ({} 字节)", path.display(), bytes.len());
        Ok(())
    }
}

/// 默认字体、标题样式和项目符号定义
fn base_document() -> Docx {
    let bullet_level = Level::new(
        0,
        Start::new(1),
        NumberFormat::new("bullet"),
        LevelText::new("•"),
        LevelJc::new("left"),
    )
    .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None);

    Docx::new()
        .default_fonts(RunFonts::new().ascii(FONT).hi_ansi(FONT).cs(FONT))
        .default_size(BODY_SIZE)
        .add_style(
            Style::new(HEADING_STYLE, StyleType::Paragraph)
                .name("Heading 1")
                .bold()
                .size(HEADING_SIZE),
        )
        .add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(bullet_level))
        .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID))
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.docx".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
