//! Names provided by the Lua runtime support library.
//!
//! The emitter only refers to these by name; their behavior lives in the
//! runtime.

use jslua_hir::BinaryOp;

pub const TO_BOOLEAN: &str = "__ToBoolean";
pub const TO_NUMBER: &str = "__ToNumber";
pub const TO_OBJECT: &str = "__ToObject";
pub const LENGTH: &str = "__Length";
pub const MAKE_ARRAY: &str = "__MakeArray";
pub const MAKE_OBJECT: &str = "__MakeObject";
pub const CALL_MEMBER: &str = "__CallMember";
pub const NEW: &str = "__New";
pub const ITERATE: &str = "__Iterate";
pub const DELETE: &str = "__Delete";
pub const TYPEOF: &str = "__Typeof";
pub const TERNARY_SAVE: &str = "__TernarySave";
pub const TERNARY_RESTORE: &str = "__TernaryRestore";
pub const SINK: &str = "__Sink";
pub const DEFINE_FUNCTION: &str = "__DefineFunction";
pub const REF_CHECK: &str = "__RefCheck";
pub const LITERAL_CALL_FAIL: &str = "__LiteralCallFail";
pub const PLUS_OP: &str = "__PlusOp";
pub const BIT_NOT: &str = "bit32.bnot";

/// Global object table at the bottom of every scope chain.
pub const GLOBAL_OBJECTS: &str = "__JsGlobalObjects";
pub const REGEXP: &str = "RegExp";
/// Runtime sentinel for JS `null`; Lua `nil` stands for `undefined`.
pub const NULL: &str = "null";

/// Binary operators that lower to a helper call, in `(op, helper)` pairs.
pub const BINARY_HELPERS: &[(BinaryOp, &str)] = &[
    (BinaryOp::Shl, "bit32.lshift"),
    (BinaryOp::UShr, "bit32.rshift"),
    (BinaryOp::Shr, "bit32.arshift"),
    (BinaryOp::EqEqEq, "rawequal"),
    (BinaryOp::NotEqEq, "rawequal"),
    (BinaryOp::BitAnd, "bit32.band"),
    (BinaryOp::BitXor, "bit32.bxor"),
    (BinaryOp::BitOr, "bit32.bor"),
    (BinaryOp::Add, PLUS_OP),
    (BinaryOp::In, "__ContainsKey"),
    (BinaryOp::InstanceOf, "__InstanceOf"),
];

pub fn binary_helper(op: BinaryOp) -> Option<&'static str> {
    BINARY_HELPERS
        .iter()
        .find(|(candidate, _)| *candidate == op)
        .map(|(_, helper)| *helper)
}

/// Names that are never wrapped in the read guard.
pub fn is_guard_exempt(name: &str) -> bool {
    name.starts_with("__")
        || name == "undefined"
        || BINARY_HELPERS.iter().any(|(_, helper)| *helper == name)
}
