mod operator_repository;
mod tweet_repository;
mod voter_repository;

pub use operator_repository::OperatorRepository;
pub use tweet_repository::{TweetFilter, TweetRepository, PAGE_SIZE};
pub use voter_repository::VoterRepository;
