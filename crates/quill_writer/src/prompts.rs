//! Prompt templates.
//!
//! Templates live in `<dir>/<kind>_prompt_<LANG>.txt` and use literal
//! `{topic}`, `{section_title}` and `{bullets}` placeholders. A missing or
//! empty file falls back to the built-in template for the language.

use std::fs;
use std::path::{Path, PathBuf};
use quill_core::{Error, Language, Result};
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Static system prompt used when no tailored one is available.
    System,
    /// Request for a topic-tailored system prompt.
    SystemRequest,
    Outline,
    Introduction,
    Section,
    Conclusion,
    Summary,
}

impl PromptKind {
    pub const ALL: [PromptKind; 7] = [
        PromptKind::System,
        PromptKind::SystemRequest,
        PromptKind::Outline,
        PromptKind::Introduction,
        PromptKind::Section,
        PromptKind::Conclusion,
        PromptKind::Summary,
    ];

    pub fn file_stem(&self) -> &'static str {
        match self {
            PromptKind::System => "system",
            PromptKind::SystemRequest => "system_request",
            PromptKind::Outline => "outline",
            PromptKind::Introduction => "introduction",
            PromptKind::Section => "section",
            PromptKind::Conclusion => "conclusion",
            PromptKind::Summary => "summary",
        }
    }

    pub fn file_name(&self, language: Language) -> String {
        format!("{}_prompt_{}.txt", self.file_stem(), language.code())
    }
}

/// Read a UTF-8 prompt file.
pub fn read_prompt(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path)
        .map_err(|e| Error::Resource(format!("Failed to load prompt '{}': {}", path.display(), e)))
}

/// Like [`read_prompt`], but a missing or unreadable file is logged and yields
/// an empty string.
pub fn load_prompt(path: impl AsRef<Path>) -> String {
    read_prompt(path).unwrap_or_else(|e| {
        error!("{}", e);
        String::new()
    })
}

/// Substitute `{name}` placeholders in a single pass.
///
/// Substituted values are never scanned again, and braces that do not name a
/// known variable (JSON examples in templates) are copied as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open + 1..];
        let value = candidate.find('}').and_then(|close| {
            let name = &candidate[..close];
            vars.iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &candidate[close + 1..];
            }
            None => {
                out.push('{');
                rest = candidate;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Format subtopics as a Markdown bullet list.
pub fn bullets(subtopics: &[String]) -> String {
    subtopics
        .iter()
        .map(|s| format!("- {}", s))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone)]
pub struct PromptLibrary {
    dir: Option<PathBuf>,
    language: Language,
}

impl PromptLibrary {
    pub fn new(dir: impl Into<PathBuf>, language: Language) -> Self {
        Self { dir: Some(dir.into()), language }
    }

    /// Library that only uses the built-in templates.
    pub fn builtin(language: Language) -> Self {
        Self { dir: None, language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn path_for(&self, kind: PromptKind) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(kind.file_name(self.language)))
    }

    pub fn template(&self, kind: PromptKind) -> String {
        if let Some(path) = self.path_for(kind) {
            let loaded = load_prompt(&path);
            if !loaded.trim().is_empty() {
                return loaded;
            }
            debug!("Using built-in {} prompt for {}", kind.file_stem(), self.language);
        }
        builtin_template(kind, self.language).to_string()
    }

    pub fn render(&self, kind: PromptKind, vars: &[(&str, &str)]) -> String {
        render(&self.template(kind), vars)
    }
}

pub fn builtin_template(kind: PromptKind, language: Language) -> &'static str {
    match (language, kind) {
        (Language::En, PromptKind::System) => EN_SYSTEM,
        (Language::En, PromptKind::SystemRequest) => EN_SYSTEM_REQUEST,
        (Language::En, PromptKind::Outline) => EN_OUTLINE,
        (Language::En, PromptKind::Introduction) => EN_INTRODUCTION,
        (Language::En, PromptKind::Section) => EN_SECTION,
        (Language::En, PromptKind::Conclusion) => EN_CONCLUSION,
        (Language::En, PromptKind::Summary) => EN_SUMMARY,
        (Language::Ru, PromptKind::System) => RU_SYSTEM,
        (Language::Ru, PromptKind::SystemRequest) => RU_SYSTEM_REQUEST,
        (Language::Ru, PromptKind::Outline) => RU_OUTLINE,
        (Language::Ru, PromptKind::Introduction) => RU_INTRODUCTION,
        (Language::Ru, PromptKind::Section) => RU_SECTION,
        (Language::Ru, PromptKind::Conclusion) => RU_CONCLUSION,
        (Language::Ru, PromptKind::Summary) => RU_SUMMARY,
    }
}

const EN_SYSTEM: &str = "You are a professional English-language article writer. \
You create well-structured, detailed, and coherent articles. \
Use a clear, formal (but approachable) tone, and expand on key ideas when asked.";

const EN_SYSTEM_REQUEST: &str = "Write a system prompt for an assistant that will write a long-form \
English article on the topic \"{topic}\". Describe the expertise, tone and audience the writer should \
adopt. Return ONLY a JSON object of the form {\"system_prompt\": \"...\"} without code fences or commentary.";

const EN_OUTLINE: &str = r#"You are an assistant that must produce a valid JSON outline for an article on "{topic}".

Return ONLY a JSON object with a single key "outline", whose value is an array.
Each element in this array is an object with:
- "title": a string identifying a main section
- "subtopics": an array of strings, each describing a subtopic

No additional commentary or code fences. Example:

{
  "outline": [
    {
      "title": "Section 1: Introduction",
      "subtopics": ["Background", "Purpose of Classification"]
    },
    {
      "title": "Section 2: Key Points",
      "subtopics": ["Point A", "Point B"]
    }
  ]
}

Now generate that JSON for the topic: {topic}."#;

const EN_INTRODUCTION: &str = "Topic: '{topic}'\n\n\
Write an Introduction that:\n\
1. Briefly hooks the reader with the importance or relevance of the topic.\n\
2. Transitions smoothly into what will be covered in the article.\n\
3. Avoids simply listing the outline sections verbatim.\n\
4. Maintains a professional yet accessible tone.\n\
Length guide: aim for ~150-200 words.";

const EN_SECTION: &str = "Topic: {topic}\n\n\
Section title: {section_title}\n\n\
Please write a cohesive text covering the main section and the following subtopics:\n\
{bullets}\n\n\
Guidelines:\n\
- Merge all subtopics into one coherent piece of writing (not separate mini-chapters).\n\
- Aim for 300-500 words total.\n\
- Maintain clarity, a formal yet approachable tone.\n\
- Avoid repeating the Introduction verbatim, but do provide context where needed.";

const EN_CONCLUSION: &str = "Topic: '{topic}'\n\n\
Based on the above content, write a **Conclusion** that:\n\
1. Restates the core topic in a succinct way.\n\
2. Summarizes the major insights or takeaways.\n\
3. Gives a closing thought or call-to-action (if relevant).\n\
4. Maintains a professional tone, about ~100 words.";

const EN_SUMMARY: &str =
    "Please summarize the following text in no more than {max_sentences} sentences:\n\n{text}";

const RU_SYSTEM: &str = "Ты профессиональный автор статей на русском языке. \
Ты пишешь хорошо структурированные, подробные и связные статьи. \
Используй ясный, деловой, но доступный стиль и раскрывай ключевые идеи, когда тебя об этом просят.";

const RU_SYSTEM_REQUEST: &str = "Напиши системный промпт для ассистента, который будет писать большую \
статью на русском языке на тему «{topic}». Опиши экспертизу, тон и аудиторию автора. \
Верни ТОЛЬКО JSON-объект вида {\"system_prompt\": \"...\"} без блоков кода и комментариев.";

const RU_OUTLINE: &str = r#"Ты ассистент, который должен вернуть корректный JSON-план статьи на тему «{topic}».

Верни ТОЛЬКО JSON-объект с единственным ключом "outline", значение которого является массивом.
Каждый элемент массива это объект с полями:
- "title": строка с названием основного раздела
- "subtopics": массив строк с подтемами раздела

Без комментариев и без блоков кода. Пример:

{
  "outline": [
    {
      "title": "Раздел 1: Введение",
      "subtopics": ["Предыстория", "Цель классификации"]
    },
    {
      "title": "Раздел 2: Ключевые моменты",
      "subtopics": ["Пункт A", "Пункт B"]
    }
  ]
}

Теперь сгенерируй такой JSON для темы: {topic}."#;

const RU_INTRODUCTION: &str = "Тема: «{topic}»\n\n\
Напиши введение, которое:\n\
1. Кратко объясняет читателю важность и актуальность темы.\n\
2. Плавно подводит к тому, о чём пойдёт речь в статье.\n\
3. Не перечисляет разделы плана дословно.\n\
4. Написано профессиональным, но доступным языком.\n\
Объём: примерно 150-200 слов.";

const RU_SECTION: &str = "Тема: {topic}\n\n\
Раздел: {section_title}\n\n\
Напиши связный текст, раскрывающий раздел и следующие подтемы:\n\
{bullets}\n\n\
Требования:\n\
- Объедини все подтемы в единый текст, а не в отдельные мини-главы.\n\
- Объём: 300-500 слов.\n\
- Пиши ясно, деловым, но доступным языком.\n\
- Не повторяй введение дословно, но давай контекст там, где нужно.";

const RU_CONCLUSION: &str = "Тема: «{topic}»\n\n\
На основе написанного выше напиши **заключение**, которое:\n\
1. Кратко повторяет основную тему.\n\
2. Подводит итоги главных выводов.\n\
3. Завершается итоговой мыслью или призывом к действию (если уместно).\n\
4. Выдержано в профессиональном тоне, около 100 слов.";

const RU_SUMMARY: &str =
    "Кратко перескажи следующий текст, используя не более {max_sentences} предложений:\n\n{text}";
