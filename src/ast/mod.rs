/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program and declaration nodes
/// - expressions: Expression nodes and operators
/// - statements: Statement nodes
/// - types: Type representations and function parameters
/// - symbol: Resolved identities shared between declarations and uses
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod symbol;
pub mod types;

#[cfg(test)]
mod tests;
