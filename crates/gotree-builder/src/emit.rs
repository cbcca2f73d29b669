//! Declaration Emitter - collects finished declarations into a file.
//!
//! The builder hands over complete units only: statement lists of ended
//! blocks, function declarations whose body has ended, and top-level
//! declarations. Nothing partially built ever reaches the emitter.

use rustc_hash::FxHashSet;

use gotree_core::ast::{BlockStmt, Decl, File, FuncDecl, Ident, Stmt};

/// Receives finished declarations from the builder.
pub trait DeclarationEmitter {
    /// Package the statements of an ended block.
    fn finish_block(&mut self, stmts: Vec<Stmt>) -> BlockStmt {
        BlockStmt { list: stmts }
    }

    /// A function or method whose body has ended.
    fn finish_function(&mut self, decl: FuncDecl);

    /// A top-level `var`, `const` or `type` declaration.
    fn emit_decl(&mut self, decl: Decl);

    /// Record that synthesized code uses the package at `path`.
    fn require_import(&mut self, path: &str);
}

/// Collects declarations into an [`ast::File`](File).
#[derive(Debug)]
pub struct FileEmitter {
    package: String,
    imports: Vec<String>,
    seen_imports: FxHashSet<String>,
    decls: Vec<Decl>,
}

impl FileEmitter {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            imports: Vec::new(),
            seen_imports: FxHashSet::default(),
            decls: Vec::new(),
        }
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn decls(&self) -> &[Decl] {
        &self.decls
    }

    pub fn into_file(self) -> File {
        File {
            package: Ident::new(self.package),
            imports: self.imports,
            decls: self.decls,
        }
    }
}

impl DeclarationEmitter for FileEmitter {
    fn finish_function(&mut self, decl: FuncDecl) {
        self.decls.push(Decl::Func(decl));
    }

    fn emit_decl(&mut self, decl: Decl) {
        self.decls.push(decl);
    }

    fn require_import(&mut self, path: &str) {
        if self.seen_imports.insert(path.to_string()) {
            self.imports.push(path.to_string());
        }
    }
}
