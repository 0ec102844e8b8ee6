pub mod blog;
pub mod comment;
pub mod page;
pub mod user;

pub use blog::{Blog, BlogChanges, NewBlog};
pub use comment::{Comment, CommentWithAuthor, NewComment};
pub use page::Page;
pub use user::{NewUser, User, UserChanges, UserCredentials};
