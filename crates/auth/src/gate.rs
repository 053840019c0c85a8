//! Button-level capability checks for screens.

use medierp_core::ModuleKey;

use crate::view::{CrudAction, capability};
use crate::{Actor, PermissionEvaluator};

/// UI-facing view over one actor's capabilities.
///
/// Adds no logic of its own: every method is a
/// [`PermissionEvaluator::can_perform_action`] or
/// [`PermissionEvaluator::can_crud`] lookup, and therefore fail-closed.
#[derive(Debug, Clone, Copy)]
pub struct ActionGate<'a> {
    evaluator: &'a PermissionEvaluator,
    actor: Option<&'a Actor>,
}

impl<'a> ActionGate<'a> {
    pub fn new(evaluator: &'a PermissionEvaluator, actor: Option<&'a Actor>) -> Self {
        Self { evaluator, actor }
    }

    pub fn allows(&self, module: &ModuleKey, flag: &str) -> bool {
        self.evaluator.can_perform_action(self.actor, module, flag)
    }

    pub fn allows_crud(&self, action: CrudAction, module: &ModuleKey) -> bool {
        self.evaluator.can_crud(self.actor, action, module)
    }

    pub fn can_edit(&self, module: &ModuleKey) -> bool {
        self.allows(module, capability::CAN_EDIT)
    }

    pub fn can_certify(&self, module: &ModuleKey) -> bool {
        self.allows(module, capability::CAN_CERTIFY)
    }

    pub fn can_export(&self, module: &ModuleKey) -> bool {
        self.allows(module, capability::CAN_EXPORT)
    }
}
