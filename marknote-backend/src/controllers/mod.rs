pub mod grammar;
pub mod health;
pub mod notes;

#[cfg(test)]
mod test_support;
