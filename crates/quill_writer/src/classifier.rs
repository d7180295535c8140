use quill_core::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Introduction,
    Conclusion,
    Body,
}

/// Decides whether an outline section duplicates the dedicated
/// introduction or conclusion.
pub trait SectionClassifier: Send + Sync {
    fn classify(&self, title: &str) -> SectionKind;
}

impl<F> SectionClassifier for F
where
    F: Fn(&str) -> SectionKind + Send + Sync,
{
    fn classify(&self, title: &str) -> SectionKind {
        self(title)
    }
}

/// Case-insensitive substring match against two keyword lists.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    introduction: Vec<String>,
    conclusion: Vec<String>,
}

const EN_INTRODUCTION: &[&str] = &["introduction", "intro", "overview"];
const EN_CONCLUSION: &[&str] = &["conclusion", "summary", "final thoughts"];
const RU_INTRODUCTION: &[&str] = &["введение", "вступление", "обзор"];
const RU_CONCLUSION: &[&str] = &["заключение", "итоги", "вывод", "резюме"];

impl KeywordClassifier {
    pub fn new<I, C, S>(introduction: I, conclusion: C) -> Self
    where
        I: IntoIterator<Item = S>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            introduction: introduction.into_iter().map(|k| k.as_ref().to_lowercase()).collect(),
            conclusion: conclusion.into_iter().map(|k| k.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn for_language(language: Language) -> Self {
        match language {
            Language::En => {
                Self::new(EN_INTRODUCTION.iter().copied(), EN_CONCLUSION.iter().copied())
            }
            Language::Ru => {
                Self::new(RU_INTRODUCTION.iter().copied(), RU_CONCLUSION.iter().copied())
            }
        }
    }
}

impl SectionClassifier for KeywordClassifier {
    fn classify(&self, title: &str) -> SectionKind {
        let title = title.to_lowercase();
        if self.introduction.iter().any(|k| title.contains(k.as_str())) {
            SectionKind::Introduction
        } else if self.conclusion.iter().any(|k| title.contains(k.as_str())) {
            SectionKind::Conclusion
        } else {
            SectionKind::Body
        }
    }
}
