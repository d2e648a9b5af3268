pub mod requests;
pub mod reviews;
pub mod skills;
pub mod users;

pub use requests::{Direction, Party, RequestStatus, SwapRequest, SwapRequestDetails};
pub use reviews::{Review, ReviewWithReviewer, Reviewer};
pub use skills::{Proficiency, Skill, SkillCategory, SkillOwner, SkillStatus, SkillWithOwner};
pub use users::{OwnUser, PublicUser, Session, User};
