// Ranking pipeline: tokenize file names, score each resume against the job
// description, order the batch. Pure code, no I/O and no session access:
// callers pass the carried job description and resumes in explicitly.

pub mod ranker;
pub mod scorer;
pub mod tokenizer;

use crate::models::upload::UploadedFile;
use crate::session::links::LinkId;
use ranker::Ranked;
use scorer::{Assessment, ResumeScorer};
use tokenizer::tokenize;

/// One resume after scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResume {
    pub name: String,
    pub assessment: Assessment,
    /// Transient view/download handle, attached by the session layer.
    pub link: Option<LinkId>,
}

impl Ranked for ScoredResume {
    fn score(&self) -> u32 {
        self.assessment.score
    }
}

/// Scores every resume against the job description's file name, in upload
/// order. Always returns exactly one entry per resume.
pub fn score_batch(
    scorer: &dyn ResumeScorer,
    job_description: &UploadedFile,
    resumes: &[UploadedFile],
) -> Vec<ScoredResume> {
    let jd_tokens = tokenize(&job_description.name);
    resumes
        .iter()
        .map(|resume| ScoredResume {
            name: resume.name.clone(),
            assessment: scorer.score(&jd_tokens, &tokenize(&resume.name)),
            link: None,
        })
        .collect()
}
