use askama::Template;

use crate::ranking::ranker::RankedResult;
use crate::ranking::ScoredResume;

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {}

#[derive(Template)]
#[template(path = "upload_jd.html")]
pub struct UploadJdTemplate {
    pub uploaded: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Template)]
#[template(path = "upload_resumes.html")]
pub struct UploadResumesTemplate {
    pub resumes: Vec<String>,
    pub prompt: Option<String>,
}

/// An empty `rows` renders the empty-state message instead of the table.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    pub rows: Vec<ResultRow>,
}

/// One table row, flattened for the template.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub rank: usize,
    pub medal: Option<&'static str>,
    pub name: String,
    pub score: u32,
    pub suggestion: &'static str,
    pub view_url: String,
    pub download_url: String,
}

impl From<&RankedResult<ScoredResume>> for ResultRow {
    fn from(result: &RankedResult<ScoredResume>) -> Self {
        let link = result.item.link.as_ref();
        ResultRow {
            rank: result.rank,
            medal: result.medal().map(|m| m.css_class()),
            name: result.item.name.clone(),
            score: result.item.assessment.score,
            suggestion: result.item.assessment.suggestion.label(),
            view_url: link.map(|l| l.view_url()).unwrap_or_default(),
            download_url: link.map(|l| l.download_url()).unwrap_or_default(),
        }
    }
}
