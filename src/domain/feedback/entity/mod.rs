pub mod feedback;
pub mod feedback_comment;
pub mod feedback_vote;
