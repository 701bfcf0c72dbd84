pub mod add_uid;
pub mod cat;
pub mod edit;
pub mod find;
pub mod info;
pub mod journal;
pub mod ls;
pub mod meta;
pub mod new;
pub mod query;
pub mod rm;
pub mod serve;
