use acsc_bytecode::{ChunkTag, HEADER_SIZE, Header, Object, ObjectFormat, encrypt_string};
use acsc_core::{
    Element, FuncKind, Function, Library, Program, Script, ScriptFlags, ScriptType, StorageClass,
    UserFunc, Var, VarShape,
};

use super::{ChunkAssembler, ChunkWriter, CodeBuffer, CodeOffsets};

fn assemble(program: &Program, offsets: &CodeOffsets, encrypt: bool) -> Object {
    let mut buffer = CodeBuffer::new();
    let header = Header::new(ObjectFormat::Full, HEADER_SIZE as u32);
    buffer.append_bytes(&header.to_bytes());
    ChunkAssembler::new(program, offsets, encrypt).write(&mut ChunkWriter::new(&mut buffer));
    Object::from_bytes(buffer.to_vec()).unwrap()
}

fn tags(object: &Object) -> Vec<String> {
    object
        .chunks()
        .map(|c| c.unwrap().tag.to_string())
        .collect()
}

fn map_var(name: &str, index: u32) -> Var {
    Var::new(name, StorageClass::Map, index)
}

fn initialized(mut var: Var, values: &[i32]) -> Var {
    var.initial = values.iter().map(|&v| Element::int(v)).collect();
    var
}

fn aggregate(name: &str, index: u32, shape: VarShape, size: u32) -> Var {
    let mut var = map_var(name, index);
    var.shape = shape;
    var.size = size;
    var
}

fn user_function(name: &str, index: u32, params: (u32, u32), size: u32) -> Function {
    Function {
        name: name.to_string(),
        min_params: params.0,
        max_params: params.1,
        has_return: true,
        kind: FuncKind::User(UserFunc {
            index,
            size,
            used: true,
        }),
    }
}

#[test]
fn chunk_writer_backpatches_length() {
    let mut buffer = CodeBuffer::new();
    buffer.append_zeros(3);
    ChunkWriter::new(&mut buffer).write_chunk(ChunkTag::LOAD, |buf| {
        buf.append_cstr("zdoom");
        buf.append_zeros(2);
    });

    let bytes = buffer.to_vec();
    assert_eq!(&bytes[3..7], b"LOAD");
    assert_eq!(bytes[7..11], 8u32.to_le_bytes());
    assert_eq!(&bytes[11..], b"zdoom\0\0\0");
    assert_eq!(buffer.tell(), buffer.len());
}

#[test]
fn empty_program_has_no_chunks() {
    let object = assemble(&Program::default(), &CodeOffsets::default(), false);
    assert!(tags(&object).is_empty());
}

#[test]
fn script_chunks() {
    let mut open = Script::new(1, ScriptType::Open);
    open.flags = ScriptFlags::NET;
    open.size = 24;
    let mut closed = Script::new(2, ScriptType::Closed);
    closed.params = 3;

    let program = Program {
        scripts: vec![open, closed],
        ..Program::default()
    };
    let offsets = CodeOffsets {
        scripts: vec![8, 20],
        functions: vec![],
    };
    let object = assemble(&program, &offsets, false);

    assert_eq!(tags(&object), ["SPTR", "SFLG", "SVCT"]);

    let sptr = object.chunk(ChunkTag::SPTR).unwrap();
    assert_eq!(sptr.body.len(), 24);
    assert_eq!(sptr.i16_at(0), Some(1));
    assert_eq!(sptr.i16_at(2), Some(1));
    assert_eq!(sptr.i32_at(4), Some(8));
    assert_eq!(sptr.i32_at(8), Some(0));
    assert_eq!(sptr.i16_at(12), Some(2));
    assert_eq!(sptr.i16_at(14), Some(0));
    assert_eq!(sptr.i32_at(16), Some(20));
    assert_eq!(sptr.i32_at(20), Some(3));

    assert_eq!(object.chunk(ChunkTag::SFLG).unwrap().body, [1, 0, 1, 0]);
    assert_eq!(object.chunk(ChunkTag::SVCT).unwrap().body, [1, 0, 24, 0]);
}

#[test]
fn function_chunks_list_imports_first() {
    let mut unused = user_function("unused", 1, (0, 0), 0);
    unused.kind = FuncKind::User(UserFunc {
        index: 1,
        size: 0,
        used: false,
    });
    let print = Function {
        name: "print".to_string(),
        min_params: 0,
        max_params: 0,
        has_return: false,
        kind: FuncKind::Format { opcode: 86 },
    };

    let program = Program {
        functions: vec![user_function("add", 1, (1, 2), 6), print],
        imports: vec![Library {
            name: "lib".to_string(),
            functions: vec![user_function("helper", 0, (1, 1), 0), unused],
            vars: vec![],
        }],
        ..Program::default()
    };
    let offsets = CodeOffsets {
        scripts: vec![],
        functions: vec![40],
    };
    let object = assemble(&program, &offsets, false);

    assert_eq!(tags(&object), ["FUNC", "FNAM", "LOAD"]);
    assert_eq!(
        object.chunk(ChunkTag::FUNC).unwrap().body,
        [1, 0, 1, 0, 0, 0, 0, 0, 3, 4, 1, 0, 40, 0, 0, 0]
    );

    let fnam = object.chunk(ChunkTag::FNAM).unwrap();
    assert_eq!(fnam.body.len(), 24);
    assert_eq!(fnam.words().take(3).collect::<Vec<_>>(), [2, 12, 19]);
    assert_eq!(fnam.cstr_at(12), Some(&b"helper"[..]));
    assert_eq!(fnam.cstr_at(19), Some(&b"add"[..]));
}

fn string_program() -> Program {
    let mut program = Program::default();
    program.strings.push("hi", true);
    program.strings.push("gone", false);
    program.strings.push("yo", true);
    program.strings.push("tail", false);
    program
}

#[test]
fn plain_string_table() {
    let object = assemble(&string_program(), &CodeOffsets::default(), false);

    let strl = object.chunk(ChunkTag::STRL).unwrap();
    assert_eq!(strl.body.len(), 32);
    assert_eq!(strl.words().take(6).collect::<Vec<_>>(), [0, 3, 0, 24, 0, 27]);
    assert_eq!(&strl.body[24..], b"hi\0yo\0\0\0");

    assert_eq!(
        object.strings().unwrap(),
        [Some(b"hi".to_vec()), None, Some(b"yo".to_vec())]
    );
}

#[test]
fn encrypted_string_table() {
    let object = assemble(&string_program(), &CodeOffsets::default(), true);

    assert!(object.chunk(ChunkTag::STRL).is_none());
    let stre = object.chunk(ChunkTag::STRE).unwrap();
    assert_eq!(stre.body[24..27], encrypt_string(b"hi", 24));
    assert_eq!(stre.body[27..30], encrypt_string(b"yo", 27));

    assert_eq!(
        object.strings().unwrap(),
        [Some(b"hi".to_vec()), None, Some(b"yo".to_vec())]
    );
}

#[test]
fn strings_are_written_as_raw_bytes() {
    // CP-1252 e-acute is one byte
    let mut program = Program::default();
    program.strings.push(b"caf\xe9", true);
    program.strings.push([0xe9u8], true);

    let plain = assemble(&program, &CodeOffsets::default(), false);
    let strl = plain.chunk(ChunkTag::STRL).unwrap();
    assert_eq!(strl.words().take(5).collect::<Vec<_>>(), [0, 2, 0, 20, 25]);
    assert_eq!(&strl.body[20..], b"caf\xe9\0\xe9\0\0");

    let encrypted = assemble(&program, &CodeOffsets::default(), true);
    let stre = encrypted.chunk(ChunkTag::STRE).unwrap();
    assert_eq!(stre.body.len(), 28);
    assert_eq!(stre.body[25..27], encrypt_string(&[0xe9], 25));
    assert_eq!(
        encrypted.strings().unwrap(),
        [Some(b"caf\xe9".to_vec()), Some(vec![0xe9])]
    );
}

#[test]
fn map_variable_chunks() {
    let mut world = Var::new("w", StorageClass::World, 0);
    world.initial = vec![Element::int(5)];

    let program = Program {
        vars: vec![
            initialized(map_var("x", 0), &[7]),
            initialized(map_var("y", 1), &[9]),
            map_var("z", 2),
            initialized(aggregate("arr", 3, VarShape::Array, 4), &[1, 0, 3, 0]),
            {
                let mut hidden = aggregate("st", 4, VarShape::Struct, 2);
                hidden.hidden = true;
                initialized(hidden, &[0, 0])
            },
            aggregate("arr2", 5, VarShape::Array, 3),
            world,
        ],
        ..Program::default()
    };
    let object = assemble(&program, &CodeOffsets::default(), false);

    assert_eq!(tags(&object), ["MINI", "ARAY", "AINI"]);

    let words = |tag| object.chunk(tag).unwrap().words().collect::<Vec<_>>();
    assert_eq!(words(ChunkTag::MINI), [0, 7, 9]);
    assert_eq!(words(ChunkTag::ARAY), [3, 4, 5, 3, 4, 2]);
    assert_eq!(words(ChunkTag::AINI), [3, 1, 0, 3]);
}

#[test]
fn import_chunks() {
    let mut ext = map_var("ext", 7);
    ext.used = true;
    let ext2 = map_var("ext2", 9);
    let mut arr = aggregate("arr", 8, VarShape::Array, 10);
    arr.used = true;

    let program = Program {
        imports: vec![
            Library {
                name: "lib".to_string(),
                functions: vec![],
                vars: vec![ext, ext2, arr],
            },
            Library {
                name: "other".to_string(),
                ..Library::default()
            },
        ],
        ..Program::default()
    };
    let object = assemble(&program, &CodeOffsets::default(), false);

    assert_eq!(tags(&object), ["LOAD", "MIMP", "AIMP"]);
    assert_eq!(object.chunk(ChunkTag::LOAD).unwrap().body, b"lib\0other\0\0\0");
    assert_eq!(object.chunk(ChunkTag::MIMP).unwrap().body, b"\x07\0\0\0ext\0");
    assert_eq!(
        object.chunk(ChunkTag::AIMP).unwrap().body,
        b"\x01\0\0\0\x08\0\0\0\x0a\0\0\0arr\0"
    );
}

fn library_program(importable: bool) -> Program {
    let mut x = initialized(map_var("x", 0), &[7]);
    x.has_string_data = true;
    let mut arr = aggregate("arr", 1, VarShape::Array, 4);
    arr.has_string_data = true;
    let mut st = aggregate("st", 2, VarShape::Struct, 3);
    st.has_string_data = true;
    st.initial = vec![Element::int(1), Element::string(3), Element::int(0)];
    let mut h = map_var("h", 4);
    h.hidden = true;

    Program {
        vars: vec![x, arr, st, map_var("z", 3), h],
        importable,
        ..Program::default()
    }
}

#[test]
fn export_chunks() {
    let object = assemble(&library_program(true), &CodeOffsets::default(), false);

    assert_eq!(
        tags(&object),
        ["MINI", "ARAY", "AINI", "MEXP", "MSTR", "ASTR", "ATAG"]
    );

    let mexp = object.chunk(ChunkTag::MEXP).unwrap();
    assert_eq!(mexp.body.len(), 32);
    assert_eq!(
        mexp.words().take(5).collect::<Vec<_>>(),
        [4, 20, 24, 27, 29]
    );
    assert_eq!(&mexp.body[20..], b"arr\0st\0z\0x\0\0");

    assert_eq!(object.chunk(ChunkTag::MSTR).unwrap().body, [0, 0, 0, 0]);
    assert_eq!(object.chunk(ChunkTag::ASTR).unwrap().body, [1, 0, 0, 0]);
    assert_eq!(
        object.chunk(ChunkTag::ATAG).unwrap().body,
        [0, 2, 0, 0, 0, 0, 1]
    );
}

#[test]
fn exports_need_an_importable_program() {
    let object = assemble(&library_program(false), &CodeOffsets::default(), false);
    assert_eq!(tags(&object), ["MINI", "ARAY", "AINI"]);
}

#[test]
fn chunk_lengths_cover_the_whole_region() {
    let mut program = library_program(true);
    program.scripts = vec![Script::new(1, ScriptType::Enter)];
    program.functions = vec![user_function("f", 0, (0, 0), 2)];
    program.strings = string_program().strings;
    let offsets = CodeOffsets {
        scripts: vec![8],
        functions: vec![12],
    };
    let object = assemble(&program, &offsets, true);

    let mut end = HEADER_SIZE;
    for chunk in object.chunks() {
        let chunk = chunk.unwrap();
        assert_eq!(chunk.offset, end, "{}", chunk.tag);
        let len = u32::from_le_bytes(object.bytes()[end + 4..end + 8].try_into().unwrap());
        assert_eq!(len as usize, chunk.body.len());
        end += 8 + chunk.body.len();
    }
    assert_eq!(end, object.bytes().len());
    assert_eq!(
        tags(&object),
        [
            "SPTR", "FUNC", "FNAM", "STRE", "MINI", "ARAY", "AINI", "MEXP", "MSTR", "ASTR",
            "ATAG"
        ]
    );
}
