pub mod mssp;

#[cfg(test)]
pub mod mock;
