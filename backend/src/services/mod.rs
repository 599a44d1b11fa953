pub mod diary;
pub mod inbox;
pub mod pets;
pub mod templates;

#[cfg(test)]
pub(crate) mod support;
