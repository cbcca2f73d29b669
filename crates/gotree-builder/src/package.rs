//! Package - the entry point for building one source file.
//!
//! Owns a [`CodeBuilder`] writing into a [`FileEmitter`] and offers the
//! package-level registration calls: types, methods, virtual fields,
//! overload groups and functions.

use gotree_core::ast::{Decl, DeclTok, File, FuncDecl, GenDecl, Ident, Spec, TypeSpec};
use gotree_core::{
    BuildError, GotreeError, Param, RegistrationError, Signature, Type, TypeHash,
};
use gotree_registry::{BitField, FuncEntry, Object, OverlapField, OverloadGroup, SymbolRegistry};
use tracing::debug;

use crate::builder::CodeBuilder;
use crate::config::BuilderConfig;
use crate::emit::{DeclarationEmitter, FileEmitter};
use crate::oracle::{GoOracle, TypeOracle};
use crate::stmt::check_param_names;
use crate::type_expr::{func_type_expr, param_field, type_expr};

/// A declared function or method, ready for [`Package::body_start`].
#[derive(Debug, Clone)]
pub struct Func {
    name: String,
    sig: Signature,
}

impl Func {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sig(&self) -> &Signature {
        &self.sig
    }

    pub fn is_method(&self) -> bool {
        self.sig.recv.is_some()
    }
}

/// Builds one package.
pub struct Package {
    cb: CodeBuilder<FileEmitter>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, BuilderConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: BuilderConfig) -> Self {
        Self::with_oracle(name, config, Box::new(GoOracle::new()))
    }

    pub fn with_oracle(
        name: impl Into<String>,
        config: BuilderConfig,
        oracle: Box<dyn TypeOracle>,
    ) -> Self {
        let name = name.into();
        let emitter = FileEmitter::new(name.clone());
        Self {
            cb: CodeBuilder::new(name, config, oracle, emitter),
        }
    }

    pub fn name(&self) -> &str {
        self.cb.registry().package()
    }

    /// The builder, for package-level initializers and open bodies.
    pub fn cb(&mut self) -> &mut CodeBuilder<FileEmitter> {
        &mut self.cb
    }

    pub fn registry(&self) -> &SymbolRegistry {
        self.cb.registry()
    }

    // ==========================================================================
    // Types
    // ==========================================================================

    /// Declare a named type. Its underlying type is set by [`init_type`].
    ///
    /// [`init_type`]: Package::init_type
    pub fn new_type(&mut self, name: &str) -> Result<TypeHash, RegistrationError> {
        let hash = self.cb.registry_mut().declare_type(name)?;
        debug!(name, "type declared");
        Ok(hash)
    }

    /// Set the underlying type of `ty` and emit `type T underlying`.
    pub fn init_type(&mut self, ty: TypeHash, underlying: Type) -> Result<(), RegistrationError> {
        let ty_expr = type_expr(self.cb.registry(), &underlying);
        self.cb.registry_mut().init_type(ty, underlying)?;
        let name = self
            .cb
            .registry()
            .named(ty)
            .map(|named| named.name.clone())
            .ok_or_else(|| RegistrationError::TypeNotFound(ty.to_string()))?;
        self.cb.emitter.emit_decl(Decl::Gen(GenDecl {
            tok: DeclTok::Type,
            specs: vec![Spec::Type(TypeSpec {
                name: Ident::new(name),
                ty: ty_expr,
            })],
        }));
        Ok(())
    }

    pub fn add_method(
        &mut self,
        ty: TypeHash,
        name: &str,
        sig: Signature,
    ) -> Result<TypeHash, RegistrationError> {
        self.cb.registry_mut().add_method(ty, name, sig)
    }

    /// Register bitfields of a struct type.
    pub fn set_bitfields(&mut self, ty: &Type, fields: Vec<BitField>) -> Result<(), RegistrationError> {
        self.cb.registry_mut().register_bitfields(ty, fields)
    }

    /// Register overlap fields of a struct type.
    pub fn set_overlap_fields(
        &mut self,
        ty: &Type,
        fields: Vec<OverlapField>,
    ) -> Result<(), RegistrationError> {
        self.cb.registry_mut().register_overlap_fields(ty, fields)
    }

    // ==========================================================================
    // Overloads
    // ==========================================================================

    pub fn insert_overload_group(&mut self, group: OverloadGroup) -> Result<(), BuildError> {
        self.cb.registry_mut().insert_overload_group(group)
    }

    /// Group package functions named `Base__<digit>` into overload groups.
    pub fn collect_overloads(&mut self) -> Result<usize, RegistrationError> {
        self.cb.registry_mut().collect_overloads()
    }

    // ==========================================================================
    // Functions and variables
    // ==========================================================================

    /// Declare a function, or a method when `recv` is given.
    ///
    /// The function is visible from this point on, including inside its own
    /// body.
    pub fn new_func(
        &mut self,
        recv: Option<Param>,
        name: &str,
        params: Vec<Param>,
        results: Vec<Param>,
        variadic: bool,
    ) -> Result<Func, GotreeError> {
        if variadic && !matches!(params.last().map(|p| &p.ty), Some(Type::Slice(_))) {
            return Err(BuildError::invalid_operation("variadic parameter must have a slice type").into());
        }
        let mut sig = Signature::new(params, results, variadic);

        match recv {
            Some(recv) => {
                let owner = recv
                    .ty
                    .named_hash()
                    .or_else(|| recv.ty.pointer_elem().and_then(Type::named_hash))
                    .ok_or_else(|| {
                        RegistrationError::TypeNotFound(self.cb.registry().type_name(&recv.ty))
                    })?;
                sig = sig.with_recv(recv);
                check_param_names(&sig)?;
                self.cb.registry_mut().add_method(owner, name, sig.clone())?;
            }
            None => {
                check_param_names(&sig)?;
                self.cb
                    .registry_mut()
                    .declare_package(name, Object::Func(FuncEntry::function(name, sig.clone())))?;
            }
        }
        debug!(name, method = sig.recv.is_some(), "function declared");
        Ok(Func {
            name: name.to_string(),
            sig,
        })
    }

    /// Open the body of `func`. Build its statements on the returned builder
    /// and close it with `end()`.
    ///
    /// # Panics
    ///
    /// If another body is still open.
    pub fn body_start(&mut self, func: &Func) -> &mut CodeBuilder<FileEmitter> {
        let registry = self.cb.registry();
        let decl = FuncDecl {
            recv: func.sig.recv.as_deref().map(|recv| param_field(registry, recv)),
            name: Ident::new(func.name.clone()),
            ty: func_type_expr(registry, &func.sig),
            body: None,
        };
        self.cb.start_function_body(decl, func.sig.clone())
    }

    /// Open a closure body, for package-level initializers such as
    /// `var f = func() { ... }`.
    pub fn new_closure(
        &mut self,
        params: Vec<Param>,
        results: Vec<Param>,
        variadic: bool,
    ) -> Result<&mut CodeBuilder<FileEmitter>, BuildError> {
        self.cb.new_closure(params, results, variadic)
    }

    /// `var names T` at package level.
    pub fn new_var(&mut self, ty: Type, names: &[&str]) -> Result<(), BuildError> {
        assert!(
            self.cb.at_package_level(),
            "Package::new_var inside a function body"
        );
        self.cb.new_var(ty, names).map(|_| ())
    }

    /// Finish the package and return its file.
    ///
    /// # Panics
    ///
    /// If a body is still open.
    pub fn finish(self) -> File {
        self.cb.into_emitter().into_file()
    }
}
