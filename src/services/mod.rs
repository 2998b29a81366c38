pub mod assignment_reconciler;
pub mod fetch_state;
pub mod profile_directory;

#[cfg(test)]
pub mod test_support;
