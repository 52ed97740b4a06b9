//! Opcodes of the ACS virtual machine.
//!
//! Ids are fixed by the machine. Names and documented argument counts
//! match what the machine's loader and disassemblers expect.

use std::fmt;

use self::ArgCount::{Fixed, Variable};

/// Documented number of inline arguments following an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgCount {
    Fixed(u8),
    /// Count is itself encoded in the stream (`pushbytes`, `casegotosorted`).
    Variable,
}

/// How the inline arguments of an opcode are sized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgLayout {
    /// Special id first (byte in compact), words after.
    SpecialCall,
    /// Every argument is one byte in both formats.
    Byte,
    /// Variable or call index: byte in compact, word in full.
    Index,
    /// Argument count (byte) then function index (16-bit) in compact.
    CallFunc,
    /// Word arguments starting at a 4-byte aligned offset.
    Aligned,
    Word,
}

/// A specialized encoding that embeds its operands inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectForm {
    /// Number of queued constants the direct form consumes.
    pub arity: usize,
    pub direct: Opcode,
    /// Variant taking one-byte operands; compact format only.
    pub direct_byte: Option<Opcode>,
}

macro_rules! opcodes {
    ($($name:ident = $id:literal, $mnemonic:literal, $args:expr;)*) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum Opcode {
            $($name = $id,)*
        }

        impl Opcode {
            /// Every opcode, in id order.
            pub const ALL: &'static [Opcode] = &[$(Opcode::$name,)*];

            pub fn from_id(id: u16) -> Option<Self> {
                match id {
                    $($id => Some(Self::$name),)*
                    _ => None,
                }
            }

            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(Self::$name => $mnemonic,)*
                }
            }

            pub fn arg_count(self) -> ArgCount {
                match self {
                    $(Self::$name => $args,)*
                }
            }
        }
    };
}

opcodes! {
    None = 0, "none", Fixed(0);
    Terminate = 1, "terminate", Fixed(0);
    Suspend = 2, "suspend", Fixed(0);
    PushNumber = 3, "pushnumber", Fixed(1);
    Lspec1 = 4, "lspec1", Fixed(1);
    Lspec2 = 5, "lspec2", Fixed(1);
    Lspec3 = 6, "lspec3", Fixed(1);
    Lspec4 = 7, "lspec4", Fixed(1);
    Lspec5 = 8, "lspec5", Fixed(1);
    Lspec1Direct = 9, "lspec1direct", Fixed(2);
    Lspec2Direct = 10, "lspec2direct", Fixed(3);
    Lspec3Direct = 11, "lspec3direct", Fixed(4);
    Lspec4Direct = 12, "lspec4direct", Fixed(5);
    Lspec5Direct = 13, "lspec5direct", Fixed(6);
    Add = 14, "add", Fixed(0);
    Subtract = 15, "subtract", Fixed(0);
    Multiply = 16, "multiply", Fixed(0);
    Divide = 17, "divide", Fixed(0);
    Modulus = 18, "modulus", Fixed(0);
    Eq = 19, "eq", Fixed(0);
    Ne = 20, "ne", Fixed(0);
    Lt = 21, "lt", Fixed(0);
    Gt = 22, "gt", Fixed(0);
    Le = 23, "le", Fixed(0);
    Ge = 24, "ge", Fixed(0);
    AssignScriptVar = 25, "assignscriptvar", Fixed(1);
    AssignMapVar = 26, "assignmapvar", Fixed(1);
    AssignWorldVar = 27, "assignworldvar", Fixed(1);
    PushScriptVar = 28, "pushscriptvar", Fixed(1);
    PushMapVar = 29, "pushmapvar", Fixed(1);
    PushWorldVar = 30, "pushworldvar", Fixed(1);
    AddScriptVar = 31, "addscriptvar", Fixed(1);
    AddMapVar = 32, "addmapvar", Fixed(1);
    AddWorldVar = 33, "addworldvar", Fixed(1);
    SubScriptVar = 34, "subscriptvar", Fixed(1);
    SubMapVar = 35, "submapvar", Fixed(1);
    SubWorldVar = 36, "subworldvar", Fixed(1);
    MulScriptVar = 37, "mulscriptvar", Fixed(1);
    MulMapVar = 38, "mulmapvar", Fixed(1);
    MulWorldVar = 39, "mulworldvar", Fixed(1);
    DivScriptVar = 40, "divscriptvar", Fixed(1);
    DivMapVar = 41, "divmapvar", Fixed(1);
    DivWorldVar = 42, "divworldvar", Fixed(1);
    ModScriptVar = 43, "modscriptvar", Fixed(1);
    ModMapVar = 44, "modmapvar", Fixed(1);
    ModWorldVar = 45, "modworldvar", Fixed(1);
    IncScriptVar = 46, "incscriptvar", Fixed(1);
    IncMapVar = 47, "incmapvar", Fixed(1);
    IncWorldVar = 48, "incworldvar", Fixed(1);
    DecScriptVar = 49, "decscriptvar", Fixed(1);
    DecMapVar = 50, "decmapvar", Fixed(1);
    DecWorldVar = 51, "decworldvar", Fixed(1);
    Goto = 52, "goto", Fixed(1);
    IfGoto = 53, "ifgoto", Fixed(1);
    Drop = 54, "drop", Fixed(0);
    Delay = 55, "delay", Fixed(0);
    DelayDirect = 56, "delaydirect", Fixed(1);
    Random = 57, "random", Fixed(0);
    RandomDirect = 58, "randomdirect", Fixed(2);
    ThingCount = 59, "thingcount", Fixed(0);
    ThingCountDirect = 60, "thingcountdirect", Fixed(2);
    TagWait = 61, "tagwait", Fixed(0);
    TagWaitDirect = 62, "tagwaitdirect", Fixed(1);
    PolyWait = 63, "polywait", Fixed(0);
    PolyWaitDirect = 64, "polywaitdirect", Fixed(1);
    ChangeFloor = 65, "changefloor", Fixed(0);
    ChangeFloorDirect = 66, "changefloordirect", Fixed(2);
    ChangeCeiling = 67, "changeceiling", Fixed(0);
    ChangeCeilingDirect = 68, "changeceilingdirect", Fixed(2);
    Restart = 69, "restart", Fixed(0);
    AndLogical = 70, "andlogical", Fixed(0);
    OrLogical = 71, "orlogical", Fixed(0);
    AndBitwise = 72, "andbitwise", Fixed(0);
    OrBitwise = 73, "orbitwise", Fixed(0);
    EorBitwise = 74, "eorbitwise", Fixed(0);
    NegateLogical = 75, "negatelogical", Fixed(0);
    Lshift = 76, "lshift", Fixed(0);
    Rshift = 77, "rshift", Fixed(0);
    UnaryMinus = 78, "unaryminus", Fixed(0);
    IfNotGoto = 79, "ifnotgoto", Fixed(1);
    LineSide = 80, "lineside", Fixed(0);
    ScriptWait = 81, "scriptwait", Fixed(0);
    ScriptWaitDirect = 82, "scriptwaitdirect", Fixed(1);
    ClearLineSpecial = 83, "clearlinespecial", Fixed(0);
    CaseGoto = 84, "casegoto", Fixed(2);
    BeginPrint = 85, "beginprint", Fixed(0);
    EndPrint = 86, "endprint", Fixed(0);
    PrintString = 87, "printstring", Fixed(0);
    PrintNumber = 88, "printnumber", Fixed(0);
    PrintCharacter = 89, "printcharacter", Fixed(0);
    PlayerCount = 90, "playercount", Fixed(0);
    GameType = 91, "gametype", Fixed(0);
    GameSkill = 92, "gameskill", Fixed(0);
    Timer = 93, "timer", Fixed(0);
    SectorSound = 94, "sectorsound", Fixed(0);
    AmbientSound = 95, "ambientsound", Fixed(0);
    SoundSequence = 96, "soundsequence", Fixed(0);
    SetLineTexture = 97, "setlinetexture", Fixed(0);
    SetLineBlocking = 98, "setlineblocking", Fixed(0);
    SetLineSpecial = 99, "setlinespecial", Fixed(0);
    ThingSound = 100, "thingsound", Fixed(0);
    EndPrintBold = 101, "endprintbold", Fixed(0);
    ActivatorSound = 102, "activatorsound", Fixed(0);
    LocalAmbientSound = 103, "localambientsound", Fixed(0);
    SetLineMonsterBlocking = 104, "setlinemonsterblocking", Fixed(0);
    PlayerBlueSkull = 105, "playerblueskull", Fixed(0);
    PlayerRedSkull = 106, "playerredskull", Fixed(0);
    PlayerYellowSkull = 107, "playeryellowskull", Fixed(0);
    PlayerMasterSkull = 108, "playermasterskull", Fixed(0);
    PlayerBlueCard = 109, "playerbluecard", Fixed(0);
    PlayerRedCard = 110, "playerredcard", Fixed(0);
    PlayerYellowCard = 111, "playeryellowcard", Fixed(0);
    PlayerMasterCard = 112, "playermastercard", Fixed(0);
    PlayerBlackSkull = 113, "playerblackskull", Fixed(0);
    PlayerSilverSkull = 114, "playersilverskull", Fixed(0);
    PlayerGoldSkull = 115, "playergoldskull", Fixed(0);
    PlayerBlackCard = 116, "playerblackcard", Fixed(0);
    PlayerSilverCard = 117, "playersilvercard", Fixed(0);
    IsMultiPlayer = 118, "ismultiplayer", Fixed(0);
    PlayerTeam = 119, "playerteam", Fixed(0);
    PlayerHealth = 120, "playerhealth", Fixed(0);
    PlayerArmorPoints = 121, "playerarmorpoints", Fixed(0);
    PlayerFrags = 122, "playerfrags", Fixed(0);
    PlayerExpert = 123, "playerexpert", Fixed(0);
    BlueTeamCount = 124, "blueteamcount", Fixed(0);
    RedTeamCount = 125, "redteamcount", Fixed(0);
    BlueTeamScore = 126, "blueteamscore", Fixed(0);
    RedTeamScore = 127, "redteamscore", Fixed(0);
    IsOneFlagCtf = 128, "isoneflagctf", Fixed(0);
    GetInvasionWave = 129, "getinvasionwave", Fixed(0);
    GetInvasionState = 130, "getinvasionstate", Fixed(0);
    PrintName = 131, "printname", Fixed(0);
    MusicChange = 132, "musicchange", Fixed(0);
    ConsoleCommandDirect = 133, "consolecommanddirect", Fixed(3);
    ConsoleCommand = 134, "consolecommand", Fixed(0);
    SinglePlayer = 135, "singleplayer", Fixed(0);
    FixedMul = 136, "fixedmul", Fixed(0);
    FixedDiv = 137, "fixeddiv", Fixed(0);
    SetGravity = 138, "setgravity", Fixed(0);
    SetGravityDirect = 139, "setgravitydirect", Fixed(1);
    SetAirControl = 140, "setaircontrol", Fixed(0);
    SetAirControlDirect = 141, "setaircontroldirect", Fixed(1);
    ClearInventory = 142, "clearinventory", Fixed(0);
    GiveInventory = 143, "giveinventory", Fixed(0);
    GiveInventoryDirect = 144, "giveinventorydirect", Fixed(2);
    TakeInventory = 145, "takeinventory", Fixed(0);
    TakeInventoryDirect = 146, "takeinventorydirect", Fixed(2);
    CheckInventory = 147, "checkinventory", Fixed(0);
    CheckInventoryDirect = 148, "checkinventorydirect", Fixed(1);
    Spawn = 149, "spawn", Fixed(0);
    SpawnDirect = 150, "spawndirect", Fixed(6);
    SpawnSpot = 151, "spawnspot", Fixed(0);
    SpawnSpotDirect = 152, "spawnspotdirect", Fixed(4);
    SetMusic = 153, "setmusic", Fixed(0);
    SetMusicDirect = 154, "setmusicdirect", Fixed(3);
    LocalSetMusic = 155, "localsetmusic", Fixed(0);
    LocalSetMusicDirect = 156, "localsetmusicdirect", Fixed(3);
    PrintFixed = 157, "printfixed", Fixed(0);
    PrintLocalized = 158, "printlocalized", Fixed(0);
    MoreHudMessage = 159, "morehudmessage", Fixed(0);
    OptHudMessage = 160, "opthudmessage", Fixed(0);
    EndHudMessage = 161, "endhudmessage", Fixed(0);
    EndHudMessageBold = 162, "endhudmessagebold", Fixed(0);
    SetStyle = 163, "setstyle", Fixed(0);
    SetStyleDirect = 164, "setstyledirect", Fixed(0);
    SetFont = 165, "setfont", Fixed(0);
    SetFontDirect = 166, "setfontdirect", Fixed(1);
    PushByte = 167, "pushbyte", Fixed(1);
    Lspec1DirectB = 168, "lspec1directb", Fixed(2);
    Lspec2DirectB = 169, "lspec2directb", Fixed(3);
    Lspec3DirectB = 170, "lspec3directb", Fixed(4);
    Lspec4DirectB = 171, "lspec4directb", Fixed(5);
    Lspec5DirectB = 172, "lspec5directb", Fixed(6);
    DelayDirectB = 173, "delaydirectb", Fixed(1);
    RandomDirectB = 174, "randomdirectb", Fixed(2);
    PushBytes = 175, "pushbytes", Variable;
    Push2Bytes = 176, "push2bytes", Fixed(2);
    Push3Bytes = 177, "push3bytes", Fixed(3);
    Push4Bytes = 178, "push4bytes", Fixed(4);
    Push5Bytes = 179, "push5bytes", Fixed(5);
    SetThingSpecial = 180, "setthingspecial", Fixed(0);
    AssignGlobalVar = 181, "assignglobalvar", Fixed(1);
    PushGlobalVar = 182, "pushglobalvar", Fixed(1);
    AddGlobalVar = 183, "addglobalvar", Fixed(1);
    SubGlobalVar = 184, "subglobalvar", Fixed(1);
    MulGlobalVar = 185, "mulglobalvar", Fixed(1);
    DivGlobalVar = 186, "divglobalvar", Fixed(1);
    ModGlobalVar = 187, "modglobalvar", Fixed(1);
    IncGlobalVar = 188, "incglobalvar", Fixed(1);
    DecGlobalVar = 189, "decglobalvar", Fixed(1);
    FadeTo = 190, "fadeto", Fixed(0);
    FadeRange = 191, "faderange", Fixed(0);
    CancelFade = 192, "cancelfade", Fixed(0);
    PlayMovie = 193, "playmovie", Fixed(0);
    SetFloorTrigger = 194, "setfloortrigger", Fixed(0);
    SetCeilingTrigger = 195, "setceilingtrigger", Fixed(0);
    GetActorX = 196, "getactorx", Fixed(0);
    GetActorY = 197, "getactory", Fixed(0);
    GetActorZ = 198, "getactorz", Fixed(0);
    StartTranslation = 199, "starttranslation", Fixed(0);
    TranslationRange1 = 200, "translationrange1", Fixed(0);
    TranslationRange2 = 201, "translationrange2", Fixed(0);
    EndTranslation = 202, "endtranslation", Fixed(0);
    Call = 203, "call", Fixed(1);
    CallDiscard = 204, "calldiscard", Fixed(1);
    ReturnVoid = 205, "returnvoid", Fixed(0);
    ReturnVal = 206, "returnval", Fixed(0);
    PushMapArray = 207, "pushmaparray", Fixed(1);
    AssignMapArray = 208, "assignmaparray", Fixed(1);
    AddMapArray = 209, "addmaparray", Fixed(1);
    SubMapArray = 210, "submaparray", Fixed(1);
    MulMapArray = 211, "mulmaparray", Fixed(1);
    DivMapArray = 212, "divmaparray", Fixed(1);
    ModMapArray = 213, "modmaparray", Fixed(1);
    IncMapArray = 214, "incmaparray", Fixed(1);
    DecMapArray = 215, "decmaparray", Fixed(1);
    Dup = 216, "dup", Fixed(0);
    Swap = 217, "swap", Fixed(0);
    WriteToIni = 218, "writetoini", Fixed(0);
    GetFromIni = 219, "getfromini", Fixed(0);
    Sin = 220, "sin", Fixed(0);
    Cos = 221, "cos", Fixed(0);
    VectorAngle = 222, "vectorangle", Fixed(0);
    CheckWeapon = 223, "checkweapon", Fixed(0);
    SetWeapon = 224, "setweapon", Fixed(0);
    TagString = 225, "tagstring", Fixed(0);
    PushWorldArray = 226, "pushworldarray", Fixed(1);
    AssignWorldArray = 227, "assignworldarray", Fixed(1);
    AddWorldArray = 228, "addworldarray", Fixed(1);
    SubWorldArray = 229, "subworldarray", Fixed(1);
    MulWorldArray = 230, "mulworldarray", Fixed(1);
    DivWorldArray = 231, "divworldarray", Fixed(1);
    ModWorldArray = 232, "modworldarray", Fixed(1);
    IncWorldArray = 233, "incworldarray", Fixed(1);
    DecWorldArray = 234, "decworldarray", Fixed(1);
    PushGlobalArray = 235, "pushglobalarray", Fixed(1);
    AssignGlobalArray = 236, "assignglobalarray", Fixed(1);
    AddGlobalArray = 237, "addglobalarray", Fixed(1);
    SubGlobalArray = 238, "subglobalarray", Fixed(1);
    MulGlobalArray = 239, "mulglobalarray", Fixed(1);
    DivGlobalArray = 240, "divglobalarray", Fixed(1);
    ModGlobalArray = 241, "modglobalarray", Fixed(1);
    IncGlobalArray = 242, "incglobalarray", Fixed(1);
    DecGlobalArray = 243, "decglobalarray", Fixed(1);
    SetMarineWeapon = 244, "setmarineweapon", Fixed(0);
    SetActorProperty = 245, "setactorproperty", Fixed(0);
    GetActorProperty = 246, "getactorproperty", Fixed(0);
    PlayerNumber = 247, "playernumber", Fixed(0);
    ActivatorTid = 248, "activatortid", Fixed(0);
    SetMarineSprite = 249, "setmarinesprite", Fixed(0);
    GetScreenWidth = 250, "getscreenwidth", Fixed(0);
    GetScreenHeight = 251, "getscreenheight", Fixed(0);
    ThingProjectile2 = 252, "thingprojectile2", Fixed(0);
    Strlen = 253, "strlen", Fixed(0);
    SetHudSize = 254, "sethudsize", Fixed(0);
    GetCvar = 255, "getcvar", Fixed(0);
    CaseGotoSorted = 256, "casegotosorted", Variable;
    SetResultValue = 257, "setresultvalue", Fixed(0);
    GetLineRowOffset = 258, "getlinerowoffset", Fixed(0);
    GetActorFloorZ = 259, "getactorfloorz", Fixed(0);
    GetActorAngle = 260, "getactorangle", Fixed(0);
    GetSectorFloorZ = 261, "getsectorfloorz", Fixed(0);
    GetSectorCeilingZ = 262, "getsectorceilingz", Fixed(0);
    Lspec5Result = 263, "lspec5result", Fixed(1);
    GetSigilPieces = 264, "getsigilpieces", Fixed(0);
    GetLevelInfo = 265, "getlevelinfo", Fixed(0);
    ChangeSky = 266, "changesky", Fixed(0);
    PlayerIngame = 267, "playeringame", Fixed(0);
    PlayerIsBot = 268, "playerisbot", Fixed(0);
    SetCameraToTexture = 269, "setcameratotexture", Fixed(0);
    EndLog = 270, "endlog", Fixed(0);
    GetAmmoCapacity = 271, "getammocapacity", Fixed(0);
    SetAmmoCapacity = 272, "setammocapacity", Fixed(0);
    PrintMapCharArray = 273, "printmapchararray", Fixed(0);
    PrintWorldCharArray = 274, "printworldchararray", Fixed(0);
    PrintGlobalCharArray = 275, "printglobalchararray", Fixed(0);
    SetActorAngle = 276, "setactorangle", Fixed(0);
    GrabInput = 277, "grabinput", Fixed(0);
    SetMousePointer = 278, "setmousepointer", Fixed(0);
    MoveMousePointer = 279, "movemousepointer", Fixed(0);
    SpawnProjectile = 280, "spawnprojectile", Fixed(0);
    GetSectorLightLevel = 281, "getsectorlightlevel", Fixed(0);
    GetActorCeilingZ = 282, "getactorceilingz", Fixed(0);
    SetActorPosition = 283, "setactorposition", Fixed(0);
    ClearActorInventory = 284, "clearactorinventory", Fixed(0);
    GiveActorInventory = 285, "giveactorinventory", Fixed(0);
    TakeActorInventory = 286, "takeactorinventory", Fixed(0);
    CheckActorInventory = 287, "checkactorinventory", Fixed(0);
    ThingCountName = 288, "thingcountname", Fixed(0);
    SpawnSpotFacing = 289, "spawnspotfacing", Fixed(0);
    PlayerClass = 290, "playerclass", Fixed(0);
    AndScriptVar = 291, "andscriptvar", Fixed(1);
    AndMapVar = 292, "andmapvar", Fixed(1);
    AndWorldVar = 293, "andworldvar", Fixed(1);
    AndGlobalVar = 294, "andglobalvar", Fixed(1);
    AndMapArray = 295, "andmaparray", Fixed(1);
    AndWorldArray = 296, "andworldarray", Fixed(1);
    AndGlobalArray = 297, "andglobalarray", Fixed(1);
    EorScriptVar = 298, "eorscriptvar", Fixed(1);
    EorMapVar = 299, "eormapvar", Fixed(1);
    EorWorldVar = 300, "eorworldvar", Fixed(1);
    EorGlobalVar = 301, "eorglobalvar", Fixed(1);
    EorMapArray = 302, "eormaparray", Fixed(1);
    EorWorldArray = 303, "eorworldarray", Fixed(1);
    EorGlobalArray = 304, "eorglobalarray", Fixed(1);
    OrScriptVar = 305, "orscriptvar", Fixed(1);
    OrMapVar = 306, "ormapvar", Fixed(1);
    OrWorldVar = 307, "orworldvar", Fixed(1);
    OrGlobalVar = 308, "orglobalvar", Fixed(1);
    OrMapArray = 309, "ormaparray", Fixed(1);
    OrWorldArray = 310, "orworldarray", Fixed(1);
    OrGlobalArray = 311, "orglobalarray", Fixed(1);
    LsScriptVar = 312, "lsscriptvar", Fixed(1);
    LsMapVar = 313, "lsmapvar", Fixed(1);
    LsWorldVar = 314, "lsworldvar", Fixed(1);
    LsGlobalVar = 315, "lsglobalvar", Fixed(1);
    LsMapArray = 316, "lsmaparray", Fixed(1);
    LsWorldArray = 317, "lsworldarray", Fixed(1);
    LsGlobalArray = 318, "lsglobalarray", Fixed(1);
    RsScriptVar = 319, "rsscriptvar", Fixed(1);
    RsMapVar = 320, "rsmapvar", Fixed(1);
    RsWorldVar = 321, "rsworldvar", Fixed(1);
    RsGlobalVar = 322, "rsglobalvar", Fixed(1);
    RsMapArray = 323, "rsmaparray", Fixed(1);
    RsWorldArray = 324, "rsworldarray", Fixed(1);
    RsGlobalArray = 325, "rsglobalarray", Fixed(1);
    GetPlayerInfo = 326, "getplayerinfo", Fixed(0);
    ChangeLevel = 327, "changelevel", Fixed(0);
    SectorDamage = 328, "sectordamage", Fixed(0);
    ReplaceTextures = 329, "replacetextures", Fixed(0);
    NegateBinary = 330, "negatebinary", Fixed(0);
    GetActorPitch = 331, "getactorpitch", Fixed(0);
    SetActorPitch = 332, "setactorpitch", Fixed(0);
    PrintBind = 333, "printbind", Fixed(0);
    SetActorState = 334, "setactorstate", Fixed(0);
    ThingDamage2 = 335, "thingdamage2", Fixed(0);
    UseInventory = 336, "useinventory", Fixed(0);
    UseActorInventory = 337, "useactorinventory", Fixed(0);
    CheckActorCeilingTexture = 338, "checkactorceilingtexture", Fixed(0);
    CheckActorFloorTexture = 339, "checkactorfloortexture", Fixed(0);
    GetActorLightLevel = 340, "getactorlightlevel", Fixed(0);
    SetMugShotState = 341, "setmugshotstate", Fixed(0);
    ThingCountSector = 342, "thingcountsector", Fixed(0);
    ThingCountNameSector = 343, "thingcountnamesector", Fixed(0);
    CheckPlayerCamera = 344, "checkplayercamera", Fixed(0);
    MorphActor = 345, "morphactor", Fixed(0);
    UnmorphActor = 346, "unmorphactor", Fixed(0);
    GetPlayerInput = 347, "getplayerinput", Fixed(0);
    ClassifyActor = 348, "classifyactor", Fixed(0);
    PrintBinary = 349, "printbinary", Fixed(0);
    PrintHex = 350, "printhex", Fixed(0);
    CallFunc = 351, "callfunc", Fixed(2);
    SaveString = 352, "savestring", Fixed(0);
    PrintMapChrange = 353, "printmapchrange", Fixed(0);
    PrintWorldChrange = 354, "printworldchrange", Fixed(0);
    PrintGlobalChrange = 355, "printglobalchrange", Fixed(0);
    StrcpyToMapChrange = 356, "strcpytomapchrange", Fixed(0);
    StrcpyToWorldChrange = 357, "strcpytoworldchrange", Fixed(0);
    StrcpyToGlobalChrange = 358, "strcpytoglobalchrange", Fixed(0);
    PushFunction = 359, "pushfunction", Fixed(1);
    CallStack = 360, "callstack", Fixed(0);
    ScriptWaitNamed = 361, "scriptwaitnamed", Fixed(0);
    TranslationRange3 = 362, "translationrange3", Fixed(0);
    GotoStack = 363, "gotostack", Fixed(0);
}

/// Highest opcode id known to the machine.
pub const MAX_OPCODE_ID: u16 = Opcode::GotoStack as u16;

impl Opcode {
    #[inline]
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Opcodes whose operand the peephole optimizer captures as a constant.
    pub fn is_number_push(self) -> bool {
        matches!(
            self,
            Self::PushNumber
                | Self::PushByte
                | Self::Push2Bytes
                | Self::Push3Bytes
                | Self::Push4Bytes
                | Self::Push5Bytes
                | Self::PushBytes
        )
    }

    /// Direct forms whose constants follow a caller-supplied special id.
    pub fn defers_immediates(self) -> bool {
        matches!(
            self,
            Self::Lspec1Direct
                | Self::Lspec2Direct
                | Self::Lspec3Direct
                | Self::Lspec4Direct
                | Self::Lspec5Direct
                | Self::Lspec1DirectB
                | Self::Lspec2DirectB
                | Self::Lspec3DirectB
                | Self::Lspec4DirectB
                | Self::Lspec5DirectB
        )
    }

    /// Inline-operand encoding of this opcode, if it has one.
    pub fn direct_form(self) -> Option<DirectForm> {
        let (arity, direct, direct_byte) = match self {
            Self::Lspec1 => (1, Self::Lspec1Direct, Some(Self::Lspec1DirectB)),
            Self::Lspec2 => (2, Self::Lspec2Direct, Some(Self::Lspec2DirectB)),
            Self::Lspec3 => (3, Self::Lspec3Direct, Some(Self::Lspec3DirectB)),
            Self::Lspec4 => (4, Self::Lspec4Direct, Some(Self::Lspec4DirectB)),
            Self::Lspec5 => (5, Self::Lspec5Direct, Some(Self::Lspec5DirectB)),
            Self::Delay => (1, Self::DelayDirect, Some(Self::DelayDirectB)),
            Self::Random => (2, Self::RandomDirect, Some(Self::RandomDirectB)),
            Self::ThingCount => (2, Self::ThingCountDirect, None),
            Self::TagWait => (1, Self::TagWaitDirect, None),
            Self::PolyWait => (1, Self::PolyWaitDirect, None),
            Self::ChangeFloor => (2, Self::ChangeFloorDirect, None),
            Self::ChangeCeiling => (2, Self::ChangeCeilingDirect, None),
            Self::ScriptWait => (1, Self::ScriptWaitDirect, None),
            Self::ConsoleCommand => (3, Self::ConsoleCommandDirect, None),
            Self::SetGravity => (1, Self::SetGravityDirect, None),
            Self::SetAirControl => (1, Self::SetAirControlDirect, None),
            Self::GiveInventory => (2, Self::GiveInventoryDirect, None),
            Self::TakeInventory => (2, Self::TakeInventoryDirect, None),
            Self::CheckInventory => (1, Self::CheckInventoryDirect, None),
            Self::Spawn => (6, Self::SpawnDirect, None),
            Self::SpawnSpot => (4, Self::SpawnSpotDirect, None),
            Self::SetMusic => (3, Self::SetMusicDirect, None),
            Self::LocalSetMusic => (3, Self::LocalSetMusicDirect, None),
            Self::SetFont => (1, Self::SetFontDirect, None),
            _ => return None,
        };
        Some(DirectForm {
            arity,
            direct,
            direct_byte,
        })
    }

    pub fn arg_layout(self) -> ArgLayout {
        match self {
            Self::Lspec1
            | Self::Lspec2
            | Self::Lspec3
            | Self::Lspec4
            | Self::Lspec5
            | Self::Lspec5Result
            | Self::Lspec1Direct
            | Self::Lspec2Direct
            | Self::Lspec3Direct
            | Self::Lspec4Direct
            | Self::Lspec5Direct => ArgLayout::SpecialCall,

            Self::PushByte
            | Self::Push2Bytes
            | Self::Push3Bytes
            | Self::Push4Bytes
            | Self::Push5Bytes
            | Self::PushBytes
            | Self::Lspec1DirectB
            | Self::Lspec2DirectB
            | Self::Lspec3DirectB
            | Self::Lspec4DirectB
            | Self::Lspec5DirectB
            | Self::DelayDirectB
            | Self::RandomDirectB => ArgLayout::Byte,

            Self::Call | Self::CallDiscard => ArgLayout::Index,
            Self::CallFunc => ArgLayout::CallFunc,
            Self::CaseGotoSorted => ArgLayout::Aligned,

            op if op.is_storage_access() => ArgLayout::Index,
            _ => ArgLayout::Word,
        }
    }

    /// Variable and array operations taking a single storage index.
    fn is_storage_access(self) -> bool {
        let id = self.id();
        matches!(
            id,
            25..=51 // script/map/world scalars
                | 181..=189 // global scalars
                | 207..=215 // map arrays
                | 226..=243 // world and global arrays
                | 291..=325 // and/eor/or/ls/rs assignments
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
