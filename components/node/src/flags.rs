//! Per type boolean flags.
//!
//! Each flag is only defined on a few node types; reading or writing a
//! flag on any other type is an error. The table below is the only place
//! defining which flag belongs to which type.

use std::fmt;

use crate::{Node, NodeError, NodeType};

macro_rules! flags {
    ($($variant:ident => $name:literal: [$($node_type:ident),+],)*) => {
        /// Flags a node can carry, depending on its type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Flag {
            $(
                #[allow(missing_docs)]
                $variant,
            )*
        }

        impl Flag {
            /// Every flag, in declaration order.
            pub const ALL: &'static [Flag] = &[$(Flag::$variant,)*];

            /// Uppercase name of the flag, i.e. `FOR_FLAG_IN`.
            pub fn name(self) -> &'static str {
                match self {
                    $(Flag::$variant => $name,)*
                }
            }

            /// Node types on which the flag is defined.
            pub fn node_types(self) -> &'static [NodeType] {
                match self {
                    $(Flag::$variant => &[$(NodeType::$node_type),+],)*
                }
            }
        }
    };
}

flags! {
    CatchFlagTyped => "CATCH_FLAG_TYPED": [Catch],

    DirectiveListFlagNewVariables => "DIRECTIVE_LIST_FLAG_NEW_VARIABLES": [DirectiveList],

    EnumFlagClass => "ENUM_FLAG_CLASS": [Enum],
    EnumFlagInuse => "ENUM_FLAG_INUSE": [Enum],

    ForFlagConst => "FOR_FLAG_CONST": [For],
    ForFlagForeach => "FOR_FLAG_FOREACH": [For],
    ForFlagIn => "FOR_FLAG_IN": [For],

    FunctionFlagGetter => "FUNCTION_FLAG_GETTER": [Function],
    FunctionFlagSetter => "FUNCTION_FLAG_SETTER": [Function],
    FunctionFlagOut => "FUNCTION_FLAG_OUT": [Function],
    FunctionFlagVoid => "FUNCTION_FLAG_VOID": [Function],
    FunctionFlagNever => "FUNCTION_FLAG_NEVER": [Function],
    FunctionFlagNoparams => "FUNCTION_FLAG_NOPARAMS": [Function],
    FunctionFlagOperator => "FUNCTION_FLAG_OPERATOR": [Function],

    IdentifierFlagWith => "IDENTIFIER_FLAG_WITH": [Identifier, Videntifier, String],
    IdentifierFlagTyped => "IDENTIFIER_FLAG_TYPED": [Identifier, Videntifier, String],

    ImportFlagImplements => "IMPORT_FLAG_IMPLEMENTS": [Import],

    PackageFlagFoundLabels => "PACKAGE_FLAG_FOUND_LABELS": [Package],
    PackageFlagReferenced => "PACKAGE_FLAG_REFERENCED": [Package],

    ParamFlagConst => "PARAM_FLAG_CONST": [Param],
    ParamFlagIn => "PARAM_FLAG_IN": [Param],
    ParamFlagOut => "PARAM_FLAG_OUT": [Param],
    ParamFlagNamed => "PARAM_FLAG_NAMED": [Param],
    ParamFlagRest => "PARAM_FLAG_REST": [Param],
    ParamFlagUnchecked => "PARAM_FLAG_UNCHECKED": [Param],
    ParamFlagUnprototyped => "PARAM_FLAG_UNPROTOTYPED": [Param],
    ParamFlagReferenced => "PARAM_FLAG_REFERENCED": [Param],
    ParamFlagParamref => "PARAM_FLAG_PARAMREF": [Param],
    ParamFlagCatch => "PARAM_FLAG_CATCH": [Param],

    ParamMatchFlagUnprototyped => "PARAM_MATCH_FLAG_UNPROTOTYPED": [ParamMatch],

    SwitchFlagDefault => "SWITCH_FLAG_DEFAULT": [Switch],

    TypeFlagModulo => "TYPE_FLAG_MODULO": [Type],

    VariableFlagConst => "VARIABLE_FLAG_CONST": [Variable, VarAttributes],
    VariableFlagFinal => "VARIABLE_FLAG_FINAL": [Variable, VarAttributes],
    VariableFlagLocal => "VARIABLE_FLAG_LOCAL": [Variable, VarAttributes],
    VariableFlagMember => "VARIABLE_FLAG_MEMBER": [Variable, VarAttributes],
    VariableFlagAttributes => "VARIABLE_FLAG_ATTRIBUTES": [Variable, VarAttributes],
    VariableFlagEnum => "VARIABLE_FLAG_ENUM": [Variable, VarAttributes],
    VariableFlagCompiled => "VARIABLE_FLAG_COMPILED": [Variable, VarAttributes],
    VariableFlagInuse => "VARIABLE_FLAG_INUSE": [Variable, VarAttributes],
    VariableFlagAttrs => "VARIABLE_FLAG_ATTRS": [Variable, VarAttributes],
    VariableFlagDefined => "VARIABLE_FLAG_DEFINED": [Variable, VarAttributes],
    VariableFlagDefining => "VARIABLE_FLAG_DEFINING": [Variable, VarAttributes],
    VariableFlagToadd => "VARIABLE_FLAG_TOADD": [Variable, VarAttributes],
}

impl Flag {
    /// Whether the flag is defined on nodes of type `node_type`.
    pub fn is_defined_on(self, node_type: NodeType) -> bool {
        self.node_types().contains(&node_type)
    }

    /// Name without the type prefix, as shown in tree dumps (i.e. `FOUND-LABELS`).
    pub fn short_name(self) -> String {
        let name = self.name();
        let short = name.split_once("_FLAG_").map_or(name, |(_, rest)| rest);
        short.replace('_', "-")
    }

    fn bit(self) -> u64 {
        1 << (self as u32)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of flags, used to compare all the flags of a node at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagSet(u64);

impl FlagSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove `flag`.
    pub fn set(&mut self, flag: Flag, value: bool) {
        if value {
            self.0 |= flag.bit();
        } else {
            self.0 &= !flag.bit();
        }
    }

    /// Whether `flag` is in the set.
    pub fn contains(&self, flag: Flag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The flags of the set, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        Flag::ALL.iter().copied().filter(|flag| self.contains(*flag))
    }
}

impl Node {
    fn verify_flag(&self, flag: Flag) -> Result<(), NodeError> {
        if flag.is_defined_on(self.get_type()) {
            Ok(())
        } else {
            Err(NodeError::IncompatibleFlag {
                flag,
                node_type: self.get_type(),
            })
        }
    }

    /// Current value of `flag`.
    pub fn get_flag(&self, flag: Flag) -> Result<bool, NodeError> {
        self.verify_flag(flag)?;
        Ok(self.flags.get() & flag.bit() != 0)
    }

    /// Change the value of `flag`.
    pub fn set_flag(&self, flag: Flag, value: bool) -> Result<(), NodeError> {
        self.verify_flag(flag)?;
        let mut set = self.get_flags();
        set.set(flag, value);
        self.flags.set(set.0);
        Ok(())
    }

    /// All the flags currently set.
    pub fn get_flags(&self) -> FlagSet {
        FlagSet(self.flags.get())
    }

    /// Whether the flags of this node are exactly `flags`.
    pub fn compare_all_flags(&self, flags: &FlagSet) -> bool {
        self.flags.get() == flags.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_fit_in_set() {
        assert!(Flag::ALL.len() <= 64);
    }

    #[test]
    fn test_every_flag_on_every_type() {
        for node_type in NodeType::ALL {
            let node = Node::new(*node_type);
            let mut expected = FlagSet::new();
            for flag in Flag::ALL {
                if flag.is_defined_on(*node_type) {
                    assert!(!node.get_flag(*flag).unwrap());
                    node.set_flag(*flag, true).unwrap();
                    expected.set(*flag, true);
                    assert!(node.get_flag(*flag).unwrap());
                    assert!(node.compare_all_flags(&expected));
                } else {
                    assert!(matches!(
                        node.get_flag(*flag),
                        Err(NodeError::IncompatibleFlag { .. })
                    ));
                    assert!(node.set_flag(*flag, true).is_err());
                }
            }
            for flag in expected.iter() {
                node.set_flag(flag, false).unwrap();
            }
            assert!(node.compare_all_flags(&FlagSet::new()));
        }
    }

    #[test]
    fn test_short_names() {
        assert_eq!(Flag::PackageFlagFoundLabels.short_name(), "FOUND-LABELS");
        assert_eq!(Flag::ForFlagIn.short_name(), "IN");
        assert_eq!(Flag::ParamMatchFlagUnprototyped.short_name(), "UNPROTOTYPED");
    }
}
