//! Call layouts for handler types.
//!
//! Memoized per (handler, ABI) on the handler node itself.

use std::sync::Arc;

use smallvec::SmallVec;

use super::{CallSignature, NativeType};
use crate::{
    Abi, BuiltinCode, HandlerInfo, Mismatch, ParamMode, RuntimeResult, TypeId, TypeInfo,
    TypeRegistry,
};

impl TypeRegistry {
    /// The call interface of `handler` under `abi`, built on first request.
    ///
    /// `in` parameters of foreign type pass their native layout by value;
    /// everything else passes a pointer. Fails if the return type or a
    /// parameter type does not resolve.
    pub fn call_layout(&mut self, handler: TypeId, abi: Abi) -> RuntimeResult<Arc<CallSignature>> {
        let Some(info) = self.as_handler(handler) else {
            return Err(Mismatch::WrongTypeKind {
                expected: "handler",
            }
            .into());
        };
        if let Some((_, cached)) = info.call_cache.iter().find(|(key, _)| *key == abi) {
            tracing::trace!(?handler, ?abi, "call layout cache hit");
            return Ok(Arc::clone(cached));
        }

        let signature = Arc::new(self.build_call_signature(info, abi)?);
        if let TypeInfo::Handler(info) = self.get_mut(handler) {
            info.call_cache.push((abi, Arc::clone(&signature)));
        }
        tracing::debug!(?handler, %signature, "built call layout");
        Ok(signature)
    }

    /// [`call_layout`](Self::call_layout) with the configured default ABI.
    pub fn call_layout_default(&mut self, handler: TypeId) -> RuntimeResult<Arc<CallSignature>> {
        let abi = self.config().default_abi;
        self.call_layout(handler, abi)
    }

    fn build_call_signature(&self, info: &HandlerInfo, abi: Abi) -> RuntimeResult<CallSignature> {
        let ret = self.resolve(info.ret)?;
        let ret = if ret.ty == TypeId::builtin_node(BuiltinCode::Null) {
            NativeType::Void
        } else {
            match self.as_foreign(ret.ty) {
                Some(foreign) => foreign.native.clone(),
                None => NativeType::POINTER,
            }
        };

        let mut args = SmallVec::new();
        for param in &info.params {
            let resolved = self.resolve(param.ty)?;
            let native = match (param.mode, self.as_foreign(resolved.ty)) {
                (ParamMode::Variadic, _) => continue,
                (ParamMode::In, Some(foreign)) => foreign.native.clone(),
                _ => NativeType::POINTER,
            };
            args.push(native);
        }

        Ok(CallSignature {
            abi,
            ret,
            fixed_args: info.is_variadic().then_some(args.len()),
            args,
        })
    }
}
