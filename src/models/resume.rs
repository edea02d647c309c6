use std::fmt::Display;

/// 简历章节，顺序即输出文档中的顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResumeSection {
    ProfessionalProfile,
    RecentExperience,
    Education,
    Skills,
}

impl ResumeSection {
    pub const ALL: [ResumeSection; 4] = [
        ResumeSection::ProfessionalProfile,
        ResumeSection::RecentExperience,
        ResumeSection::Education,
        ResumeSection::Skills,
    ];

    /// 文档中使用的标准标题
    pub fn heading(&self) -> &'static str {
        match self {
            ResumeSection::ProfessionalProfile => "Professional Profile",
            ResumeSection::RecentExperience => "Recent Experience",
            ResumeSection::Education => "Education",
            ResumeSection::Skills => "Skills",
        }
    }

    /// 模型可能使用的其他写法（均为小写）
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            ResumeSection::ProfessionalProfile => &[
                "professional profile",
                "profile",
                "professional summary",
                "summary",
            ],
            ResumeSection::RecentExperience => &[
                "recent experience",
                "experience",
                "work experience",
                "professional experience",
            ],
            ResumeSection::Education => &["education", "education and training"],
            ResumeSection::Skills => &["skills", "technical skills", "skills and languages"],
        }
    }

    /// 按标题或别名识别章节（忽略大小写）
    pub fn from_heading(text: &str) -> Option<Self> {
        let normalized = text.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|section| section.aliases().contains(&normalized.as_str()))
    }
}

impl Display for ResumeSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.heading())
    }
}

/// 原始简历文本，保证非空
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResume {
    text: String,
}

impl RawResume {
    /// 内容为空白时返回 `None`
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self { text })
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 第一行非空文本，通常是姓名或职位
    pub fn headline(&self) -> &str {
        self.text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
    }
}

/// 一次模型调用的提示词
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub system: String,
    pub user: String,
}

/// 模型整理后的简历，按章节顺序保存
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredResume {
    sections: Vec<(ResumeSection, String)>,
}

impl StructuredResume {
    /// 追加章节内容；空内容会被忽略，重复章节会合并
    pub fn push(&mut self, section: ResumeSection, body: &str) {
        let body = body.trim();
        if body.is_empty() {
            return;
        }

        match self.sections.iter_mut().find(|(s, _)| *s == section) {
            Some((_, existing)) => {
                existing.push('\n');
                existing.push_str(body);
            }
            None => {
                self.sections.push((section, body.to_string()));
                self.sections.sort_by_key(|(s, _)| *s);
            }
        }
    }

    /// 替换已有章节的内容
    pub fn replace(&mut self, section: ResumeSection, body: String) {
        if let Some((_, existing)) = self.sections.iter_mut().find(|(s, _)| *s == section) {
            *existing = body;
        }
    }

    pub fn get(&self, section: ResumeSection) -> Option<&str> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, body)| body.as_str())
    }

    pub fn sections(&self) -> impl Iterator<Item = (ResumeSection, &str)> {
        self.sections.iter().map(|(s, body)| (*s, body.as_str()))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// 缺失的章节
    pub fn missing(&self) -> Vec<ResumeSection> {
        ResumeSection::ALL
            .into_iter()
            .filter(|section| self.get(*section).is_none())
            .collect()
    }
}

/// 示例简历中的纯文本，用作格式参考
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleResume {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_resume_rejects_blank_text() {
        assert!(RawResume::new("   \n\t").is_none());
        assert!(RawResume::new("Jane Doe").is_some());
    }

    #[test]
    fn test_headline_skips_leading_blank_lines() {
        let raw = RawResume::new("\n\n  Jane Doe, Data Engineer \nBerlin").unwrap();
        assert_eq!(raw.headline(), "Jane Doe, Data Engineer");
    }

    #[test]
    fn test_from_heading_accepts_aliases() {
        assert_eq!(
            ResumeSection::from_heading("Work Experience"),
            Some(ResumeSection::RecentExperience)
        );
        assert_eq!(
            ResumeSection::from_heading("SUMMARY"),
            Some(ResumeSection::ProfessionalProfile)
        );
        assert_eq!(ResumeSection::from_heading("Hobbies"), None);
    }

    #[test]
    fn test_push_keeps_canonical_order_and_merges_duplicates() {
        let mut resume = StructuredResume::default();
        resume.push(ResumeSection::Skills, "Rust");
        resume.push(ResumeSection::ProfessionalProfile, "Engineer");
        resume.push(ResumeSection::Skills, "SQL");
        resume.push(ResumeSection::Education, "   ");

        let order: Vec<_> = resume.sections().map(|(s, _)| s).collect();
        assert_eq!(
            order,
            vec![ResumeSection::ProfessionalProfile, ResumeSection::Skills]
        );
        assert_eq!(resume.get(ResumeSection::Skills), Some("Rust\nSQL"));
        assert_eq!(
            resume.missing(),
            vec![ResumeSection::RecentExperience, ResumeSection::Education]
        );
    }
}
