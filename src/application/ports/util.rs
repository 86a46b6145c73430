/// Produces opaque authorization code values.
///
/// Implementations must draw from a CSPRNG; a seeded or predictable generator turns
/// every outstanding code into a guessable credential.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}
