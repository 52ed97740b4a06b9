//! Finalized program handed over by semantic analysis.
//!
//! Every index, size and storage class here is already allocated. The
//! backend reads these values and never recomputes them.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::StringTable;

// ============================================================================
// Variables
// ============================================================================

/// Scope/lifetime category of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageClass {
    /// Per-invocation (script or function locals).
    Script,
    /// Per-map (level) storage.
    Map,
    /// Per-world (hub) storage.
    World,
    /// Per-game storage.
    Global,
}

impl StorageClass {
    /// Number of index slots the virtual machine provides for this class.
    ///
    /// Local variables live in the frame, so they have no fixed limit.
    pub fn location_limit(self) -> Option<u32> {
        match self {
            Self::Script => None,
            Self::Map => Some(128),
            Self::World => Some(256),
            Self::Global => Some(64),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Map => "map",
            Self::World => "world",
            Self::Global => "global",
        }
    }
}

impl std::fmt::Display for StorageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Layout of a variable's storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarShape {
    #[default]
    Scalar,
    Array,
    Struct,
}

/// What an initializer element holds at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ElementTag {
    #[default]
    Integer = 0,
    String = 1,
    Function = 2,
}

/// One initializer slot, already folded to its final value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub value: i32,
    #[serde(default)]
    pub tag: ElementTag,
}

impl Element {
    pub fn int(value: i32) -> Self {
        Self {
            value,
            tag: ElementTag::Integer,
        }
    }

    /// A string element; `value` is the string's table index.
    pub fn string(value: i32) -> Self {
        Self {
            value,
            tag: ElementTag::String,
        }
    }
}

/// A variable with its final storage location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Var {
    pub name: String,
    pub storage: StorageClass,
    pub index: u32,
    /// Element count. 1 for scalars.
    #[serde(default = "one")]
    pub size: u32,
    #[serde(default)]
    pub shape: VarShape,
    /// Hidden variables are not exported to importers.
    #[serde(default)]
    pub hidden: bool,
    /// Only meaningful for variables of imported libraries.
    #[serde(default)]
    pub used: bool,
    /// The initial value carries string-typed data.
    #[serde(default)]
    pub has_string_data: bool,
    /// Dense initializer, element 0 first. String initializers arrive
    /// already expanded to one element per character.
    #[serde(default)]
    pub initial: Vec<Element>,
}

fn one() -> u32 {
    1
}

impl Var {
    pub fn new(name: impl Into<String>, storage: StorageClass, index: u32) -> Self {
        Self {
            name: name.into(),
            storage,
            index,
            size: 1,
            shape: VarShape::Scalar,
            hidden: false,
            used: false,
            has_string_data: false,
            initial: Vec::new(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.shape == VarShape::Scalar
    }

    /// Arrays and structs both occupy an array slot in the object file.
    pub fn is_aggregate(&self) -> bool {
        !self.is_scalar()
    }

    /// Initial value of a scalar, zero when uninitialized.
    pub fn initial_value(&self) -> i32 {
        self.initial.first().map_or(0, |e| e.value)
    }

    /// Number of leading elements up to and including the last nonzero one.
    pub fn initialized_len(&self) -> usize {
        self.initial
            .iter()
            .rposition(|e| e.value != 0)
            .map_or(0, |i| i + 1)
    }

    /// Number of leading elements up to and including the last string one.
    pub fn tagged_len(&self) -> usize {
        self.initial
            .iter()
            .rposition(|e| e.tag == ElementTag::String)
            .map_or(0, |i| i + 1)
    }
}

// ============================================================================
// Scripts
// ============================================================================

/// Script activation type, as stored in SPTR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum ScriptType {
    #[default]
    Closed = 0,
    Open = 1,
    Respawn = 2,
    Death = 3,
    Enter = 4,
    Pickup = 5,
    BlueReturn = 6,
    RedReturn = 7,
    WhiteReturn = 8,
    Lightning = 12,
    Unloading = 13,
    Disconnect = 14,
    Return = 15,
    Event = 16,
}

impl ScriptType {
    pub fn code(self) -> i16 {
        self as i16
    }
}

bitflags! {
    /// Script flags, as stored in SFLG.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ScriptFlags: u16 {
        const NET = 0x1;
        const CLIENTSIDE = 0x2;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub number: i32,
    #[serde(default)]
    pub kind: ScriptType,
    #[serde(default)]
    pub flags: ScriptFlags,
    #[serde(default)]
    pub params: u32,
    /// Frame size in slots, parameters included.
    #[serde(default)]
    pub size: u32,
}

impl Script {
    pub fn new(number: i32, kind: ScriptType) -> Self {
        Self {
            number,
            kind,
            flags: ScriptFlags::empty(),
            params: 0,
            size: 0,
        }
    }
}

// ============================================================================
// Functions
// ============================================================================

/// How a callable is implemented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FuncKind {
    /// Line special invoked through the lspec family.
    ActionSpecial { id: i32 },
    /// Engine extension invoked through `callfunc`.
    Extension { id: i32 },
    /// Builtin backed by a single opcode.
    Dedicated { opcode: u16 },
    /// Print-style builtin whose items were emitted beforehand.
    Format { opcode: u16 },
    /// Function with a body in this or an imported library.
    User(UserFunc),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFunc {
    /// Call index, shared by imports and local functions.
    pub index: u32,
    /// Frame size in slots, parameters included.
    #[serde(default)]
    pub size: u32,
    /// Only meaningful for imported functions.
    #[serde(default)]
    pub used: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub min_params: u32,
    #[serde(default)]
    pub max_params: u32,
    #[serde(default)]
    pub has_return: bool,
    #[serde(flatten)]
    pub kind: FuncKind,
}

impl Function {
    pub fn user(&self) -> Option<&UserFunc> {
        match &self.kind {
            FuncKind::User(user) => Some(user),
            _ => None,
        }
    }

    /// Optional parameters reserve one hidden slot for the passed count.
    pub fn param_slots(&self) -> u32 {
        if self.min_params != self.max_params {
            self.max_params + 1
        } else {
            self.max_params
        }
    }
}

// ============================================================================
// Program
// ============================================================================

/// A dependency loaded with `#import`-style linking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    #[serde(default)]
    pub functions: Vec<Function>,
    #[serde(default)]
    pub vars: Vec<Var>,
}

impl Library {
    /// Imported user functions the program actually calls.
    pub fn used_functions(&self) -> impl Iterator<Item = &Function> {
        self.functions
            .iter()
            .filter(|f| f.user().is_some_and(|u| u.used))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub scripts: Vec<Script>,
    /// Functions declared in this program, in declaration order.
    #[serde(default)]
    pub functions: Vec<Function>,
    #[serde(default)]
    pub vars: Vec<Var>,
    /// Dependencies in import order.
    #[serde(default)]
    pub imports: Vec<Library>,
    #[serde(default)]
    pub strings: StringTable,
    /// The program is a library that others may import.
    #[serde(default)]
    pub importable: bool,
}

impl Program {
    /// Local functions with a body.
    pub fn user_functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter().filter(|f| f.user().is_some())
    }

    /// Imported functions that end up in the function table.
    pub fn imported_functions(&self) -> impl Iterator<Item = &Function> {
        self.imports.iter().flat_map(Library::used_functions)
    }

    /// Function table order: used imports first, then local functions.
    pub fn function_table(&self) -> impl Iterator<Item = &Function> {
        self.imported_functions().chain(self.user_functions())
    }

    /// Map variables of this program.
    pub fn map_vars(&self) -> impl Iterator<Item = &Var> {
        self.vars.iter().filter(|v| v.storage == StorageClass::Map)
    }

    /// Map variables of imported libraries that this program uses.
    pub fn used_imported_map_vars(&self) -> impl Iterator<Item = &Var> {
        self.imports
            .iter()
            .flat_map(|lib| lib.vars.iter())
            .filter(|v| v.storage == StorageClass::Map && v.used)
    }
}

/// Parse a finalized program from JSON.
pub fn parse_program(json: &str) -> Result<Program, serde_json::Error> {
    serde_json::from_str(json)
}
