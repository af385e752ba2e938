mod display_name;
mod email;
mod uid;

pub use display_name::DisplayName;
pub use email::Email;
pub use uid::Uid;

pub trait Field
where
  Self: std::marker::Sized,
{
  fn as_str(&self) -> &str;
  fn into_string(self) -> String;
}

pub trait TryNewField<T>
where
  Self: std::marker::Sized,
{
  fn new(input: T) -> Result<Self, anyhow::Error>;
}
