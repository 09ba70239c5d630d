use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use uuid::Uuid;

use super::StoredFile;
use crate::catalog::CatalogEntry;

/// Text fields of an upload, as submitted.
///
/// Missing or empty fields fall back to defaults when the entry is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub difficulty: Option<String>,
    pub source: Option<String>,
    /// Comma separated.
    pub tags: Option<String>,
    /// One per line.
    pub knowledge_points: Option<String>,
    pub year: Option<String>,
    pub grade: Option<String>,
    pub author: Option<String>,
    pub page_count: Option<String>,
    pub question_count: Option<String>,
    pub total_score: Option<String>,
    pub has_answer: Option<String>,
    pub answer_included: Option<String>,
    pub is_original: Option<String>,
    pub recommended_time: Option<String>,
    pub region: Option<String>,
    pub remarks: Option<String>,
}

impl UploadForm {
    /// Set a field by its form name. Returns false for unknown names.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "description" => &mut self.description,
            "subject" => &mut self.subject,
            "difficulty" => &mut self.difficulty,
            "source" => &mut self.source,
            "tags" => &mut self.tags,
            "knowledgePoints" => &mut self.knowledge_points,
            "year" => &mut self.year,
            "grade" => &mut self.grade,
            "author" => &mut self.author,
            "pageCount" => &mut self.page_count,
            "questionCount" => &mut self.question_count,
            "totalScore" => &mut self.total_score,
            "hasAnswer" => &mut self.has_answer,
            "answerIncluded" => &mut self.answer_included,
            "isOriginal" => &mut self.is_original,
            "recommendedTime" => &mut self.recommended_time,
            "region" => &mut self.region,
            "remarks" => &mut self.remarks,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Build the catalog entry for an upload received at `now`.
    pub fn into_entry(
        self,
        exam: &StoredFile,
        previews: &[&StoredFile],
        now: DateTime<Utc>,
    ) -> CatalogEntry {
        let id = format!("exam-{}", &Uuid::new_v4().to_string()[..12]);
        let mut entry = CatalogEntry::new(id, text_or(&self.name, "未命名试卷"));

        entry.description = text_or(&self.description, "");
        entry.subject = text_or(&self.subject, "其他");
        entry.difficulty = text_or(&self.difficulty, "中等");
        entry.source = text_or(&self.source, "内部上传");
        entry.tags = split_list(self.tags.as_deref(), ',');
        entry.knowledge_points = split_list(self.knowledge_points.as_deref(), '\n');

        entry.file_url = exam.public_url();
        entry.file_size = exam.size;
        entry.file_size_formatted = Some(format_file_size(exam.size));
        entry.file_format = exam.format_label();
        entry.preview_images = previews.iter().map(|p| p.public_url()).collect();

        entry.year = Some(
            positive_int(self.year.as_deref())
                .and_then(|n| i32::try_from(n).ok())
                .unwrap_or(now.year()),
        );
        entry.grade = Some(text_or(&self.grade, "高三"));
        entry.author = Some(text_or(&self.author, "管理员"));
        entry.page_count = Some(positive_u32(self.page_count.as_deref()).unwrap_or(1));
        entry.question_count =
            leading_int(self.question_count.as_deref()).and_then(|n| u32::try_from(n).ok());
        entry.total_score =
            leading_int(self.total_score.as_deref()).and_then(|n| u32::try_from(n).ok());
        entry.has_answer = is_true(&self.has_answer);
        entry.answer_included = is_true(&self.answer_included);
        entry.is_original = is_true(&self.is_original);
        entry.recommended_time = Some(positive_u32(self.recommended_time.as_deref()).unwrap_or(60));
        entry.region = Some(text_or(&self.region, ""));
        entry.remarks = Some(text_or(&self.remarks, ""));

        entry.upload_date = Some(now.format("%Y-%m-%d").to_string());
        entry.upload_timestamp = Some(now.timestamp_millis());
        entry.last_modified = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
        entry
    }
}

fn text_or(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

fn is_true(value: &Option<String>) -> bool {
    value.as_deref() == Some("true")
}

/// Trimmed, non-empty items of a `separator`-delimited list.
fn split_list(value: Option<&str>, separator: char) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Leading non-negative integer of `value`, ignoring leading whitespace
/// and any trailing text ("12 页" is 12).
fn leading_int(value: Option<&str>) -> Option<i64> {
    let trimmed = value?.trim_start();
    let digits: String = trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Like [`leading_int`] but zero counts as absent.
fn positive_int(value: Option<&str>) -> Option<i64> {
    leading_int(value).filter(|n| *n > 0)
}

/// [`positive_int`] that also fits in a `u32`; anything larger is absent.
fn positive_u32(value: Option<&str>) -> Option<u32> {
    positive_int(value).and_then(|n| u32::try_from(n).ok())
}

/// Human-readable size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2 MB`.
///
/// Two decimals at most, trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
