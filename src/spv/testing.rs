//! In-process SPIR-V assembler for test fixtures.
use super::consts::*;

const EXEC_MODEL_VERTEX: u32 = 0;
const EXEC_MODEL_FRAGMENT: u32 = 4;
const EXEC_MODEL_GL_COMPUTE: u32 = 5;
const EXEC_MODE_ORIGIN_UPPER_LEFT: u32 = 7;
const EXEC_MODE_LOCAL_SIZE: u32 = 17;
const BUILT_IN_VERTEX_INDEX: u32 = 42;

fn push_instr(buf: &mut Vec<u32>, opcode: u32, operands: &[u32]) {
    buf.push((((operands.len() + 1) as u32) << 16) | opcode);
    buf.extend_from_slice(operands);
}
fn str_words(s: &str) -> Vec<u32> {
    let mut bytes = s.as_bytes().to_owned();
    bytes.push(0);
    while bytes.len() % 4 != 0 { bytes.push(0); }
    bytes.chunks(4)
        .map(|x| u32::from_le_bytes([x[0], x[1], x[2], x[3]]))
        .collect()
}

pub struct SpirvBuilder {
    next_id: u32,
    u32_ty: Option<u32>,
    entry_points: Vec<u32>,
    exec_modes: Vec<u32>,
    names: Vec<u32>,
    decos: Vec<u32>,
    globals: Vec<u32>,
    funcs: Vec<u32>,
}
impl SpirvBuilder {
    pub fn new() -> SpirvBuilder {
        SpirvBuilder {
            next_id: 1,
            u32_ty: None,
            entry_points: Vec::new(),
            exec_modes: Vec::new(),
            names: Vec::new(),
            decos: Vec::new(),
            globals: Vec::new(),
            funcs: Vec::new(),
        }
    }
    pub fn id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
    fn global(&mut self, opcode: u32, operands: &[u32]) -> u32 {
        let id = self.id();
        let mut ops = vec![id];
        ops.extend_from_slice(operands);
        push_instr(&mut self.globals, opcode, &ops);
        id
    }

    pub fn name(&mut self, id: u32, name: &str) {
        let mut ops = vec![id];
        ops.extend(str_words(name));
        push_instr(&mut self.names, OP_NAME, &ops);
    }
    pub fn member_name(&mut self, id: u32, idx: u32, name: &str) {
        let mut ops = vec![id, idx];
        ops.extend(str_words(name));
        push_instr(&mut self.names, OP_MEMBER_NAME, &ops);
    }
    pub fn deco(&mut self, id: u32, deco: u32, params: &[u32]) {
        let mut ops = vec![id, deco];
        ops.extend_from_slice(params);
        push_instr(&mut self.decos, OP_DECORATE, &ops);
    }
    pub fn member_deco(&mut self, id: u32, idx: u32, deco: u32, params: &[u32]) {
        let mut ops = vec![id, idx, deco];
        ops.extend_from_slice(params);
        push_instr(&mut self.decos, OP_MEMBER_DECORATE, &ops);
    }

    pub fn ty_void(&mut self) -> u32 { self.global(OP_TYPE_VOID, &[]) }
    pub fn ty_int(&mut self, nbit: u32, is_signed: bool) -> u32 {
        self.global(OP_TYPE_INT, &[nbit, is_signed as u32])
    }
    pub fn ty_float(&mut self, nbit: u32) -> u32 { self.global(OP_TYPE_FLOAT, &[nbit]) }
    pub fn ty_vec(&mut self, elem_ty: u32, nelem: u32) -> u32 {
        self.global(OP_TYPE_VECTOR, &[elem_ty, nelem])
    }
    pub fn ty_mat(&mut self, col_ty: u32, ncol: u32) -> u32 {
        self.global(OP_TYPE_MATRIX, &[col_ty, ncol])
    }
    pub fn ty_image(&mut self, sampled_ty: u32, dim: u32, sampled: u32) -> u32 {
        // Storage images are declared with `Rgba32f`.
        let fmt = if sampled == IMG_STORAGE { 1 } else { 0 };
        self.global(OP_TYPE_IMAGE, &[sampled_ty, dim, 0, 0, 0, sampled, fmt])
    }
    pub fn ty_sampled_image(&mut self, img_ty: u32) -> u32 {
        self.global(OP_TYPE_SAMPLED_IMAGE, &[img_ty])
    }
    pub fn ty_array(&mut self, elem_ty: u32, nelem: u32) -> u32 {
        let u32_ty = match self.u32_ty {
            Some(x) => x,
            None => {
                let x = self.ty_int(32, false);
                self.u32_ty = Some(x);
                x
            },
        };
        let len = self.id();
        push_instr(&mut self.globals, OP_CONSTANT, &[u32_ty, len, nelem]);
        self.global(OP_TYPE_ARRAY, &[elem_ty, len])
    }
    pub fn ty_runtime_array(&mut self, elem_ty: u32) -> u32 {
        self.global(OP_TYPE_RUNTIME_ARRAY, &[elem_ty])
    }
    pub fn ty_struct(&mut self, member_tys: &[u32]) -> u32 {
        self.global(OP_TYPE_STRUCT, member_tys)
    }
    pub fn ty_ptr(&mut self, store_cls: u32, ty: u32) -> u32 {
        self.global(OP_TYPE_POINTER, &[store_cls, ty])
    }
    pub fn var(&mut self, ty: u32, store_cls: u32) -> u32 {
        let ptr_ty = self.ty_ptr(store_cls, ty);
        let id = self.id();
        push_instr(&mut self.globals, OP_VARIABLE, &[ptr_ty, id, store_cls]);
        id
    }

    /// Declare `main` with an empty body.
    pub fn entry_point(&mut self, exec_model: u32, name: &str, interface: &[u32]) {
        let void_ty = self.ty_void();
        let func_ty = self.global(OP_TYPE_FUNCTION, &[void_ty]);
        let func = self.id();
        let label = self.id();
        push_instr(&mut self.funcs, OP_FUNCTION, &[void_ty, func, 0, func_ty]);
        push_instr(&mut self.funcs, OP_LABEL, &[label]);
        push_instr(&mut self.funcs, OP_RETURN, &[]);
        push_instr(&mut self.funcs, OP_FUNCTION_END, &[]);

        let mut ops = vec![exec_model, func];
        ops.extend(str_words(name));
        ops.extend_from_slice(interface);
        push_instr(&mut self.entry_points, OP_ENTRY_POINT, &ops);
        match exec_model {
            EXEC_MODEL_FRAGMENT => {
                push_instr(&mut self.exec_modes, OP_EXECUTION_MODE,
                    &[func, EXEC_MODE_ORIGIN_UPPER_LEFT]);
            },
            EXEC_MODEL_GL_COMPUTE => {
                push_instr(&mut self.exec_modes, OP_EXECUTION_MODE,
                    &[func, EXEC_MODE_LOCAL_SIZE, 1, 1, 1]);
            },
            _ => {},
        }
        self.name(func, name);
    }

    pub fn build(self) -> Vec<u32> {
        let mut words = vec![SPIRV_MAGIC, 0x00010300, 0, self.next_id, 0];
        // `Shader` capability and `Logical GLSL450` memory model.
        push_instr(&mut words, OP_CAPABILITY, &[1]);
        push_instr(&mut words, OP_MEMORY_MODEL, &[0, 1]);
        words.extend(self.entry_points);
        words.extend(self.exec_modes);
        words.extend(self.names);
        words.extend(self.decos);
        words.extend(self.globals);
        words.extend(self.funcs);
        words
    }
}

/// `uniform Camera { mat4 view_proj; };` at set 0 binding 0, declared without
/// an instance name.
fn camera_block(b: &mut SpirvBuilder, mat4_ty: u32) {
    let ty = b.ty_struct(&[mat4_ty]);
    b.name(ty, "Camera");
    b.member_name(ty, 0, "view_proj");
    b.deco(ty, DECO_BLOCK, &[]);
    b.member_deco(ty, 0, DECO_OFFSET, &[0]);
    b.member_deco(ty, 0, DECO_COL_MAJOR, &[]);
    b.member_deco(ty, 0, DECO_MATRIX_STRIDE, &[16]);
    let var = b.var(ty, STORE_CLS_UNIFORM);
    b.name(var, "");
    b.deco(var, DECO_DESCRIPTOR_SET, &[0]);
    b.deco(var, DECO_BINDING, &[0]);
}
/// `layout(push_constant) uniform Push { vec4 tint; } pc;`
fn push_block(b: &mut SpirvBuilder, vec4_ty: u32) {
    let ty = b.ty_struct(&[vec4_ty]);
    b.name(ty, "Push");
    b.member_name(ty, 0, "tint");
    b.deco(ty, DECO_BLOCK, &[]);
    b.member_deco(ty, 0, DECO_OFFSET, &[0]);
    let var = b.var(ty, STORE_CLS_PUSH_CONSTANT);
    b.name(var, "pc");
}
fn input(b: &mut SpirvBuilder, ty: u32, name: &str, location: u32) -> u32 {
    let var = b.var(ty, STORE_CLS_INPUT);
    b.name(var, name);
    b.deco(var, DECO_LOCATION, &[location]);
    var
}

/// Vertex shader with inputs `position: vec3` at location 0, `color: vec4`
/// at 1, `uv: float` at 2 (declared out of order) and `gl_VertexIndex`; the
/// `Camera` block and the `Push` push constant block.
pub fn vert_spv() -> Vec<u32> {
    let mut b = SpirvBuilder::new();
    let f32_ty = b.ty_float(32);
    let i32_ty = b.ty_int(32, true);
    let vec3_ty = b.ty_vec(f32_ty, 3);
    let vec4_ty = b.ty_vec(f32_ty, 4);
    let mat4_ty = b.ty_mat(vec4_ty, 4);

    let uv = input(&mut b, f32_ty, "input.uv", 2);
    let position = input(&mut b, vec3_ty, "input.position", 0);
    let vert_idx = b.var(i32_ty, STORE_CLS_INPUT);
    b.name(vert_idx, "gl_VertexIndex");
    b.deco(vert_idx, DECO_BUILT_IN, &[BUILT_IN_VERTEX_INDEX]);
    let color = input(&mut b, vec4_ty, "input.color", 1);

    camera_block(&mut b, mat4_ty);
    push_block(&mut b, vec4_ty);
    b.entry_point(EXEC_MODEL_VERTEX, "main", &[uv, position, vert_idx, color]);
    b.build()
}

/// Fragment shader with the `Camera` block, `View { float time; float scale; }`
/// at binding 1, `sampler2D textures[4]` at binding 2 and the `Push` push
/// constant block.
pub fn frag_spv() -> Vec<u32> {
    let mut b = SpirvBuilder::new();
    let f32_ty = b.ty_float(32);
    let vec4_ty = b.ty_vec(f32_ty, 4);
    let mat4_ty = b.ty_mat(vec4_ty, 4);

    camera_block(&mut b, mat4_ty);

    let view_ty = b.ty_struct(&[f32_ty, f32_ty]);
    b.name(view_ty, "ViewData");
    b.member_name(view_ty, 0, "time");
    b.member_name(view_ty, 1, "scale");
    b.deco(view_ty, DECO_BLOCK, &[]);
    b.member_deco(view_ty, 0, DECO_OFFSET, &[0]);
    b.member_deco(view_ty, 1, DECO_OFFSET, &[4]);
    let view = b.var(view_ty, STORE_CLS_UNIFORM);
    b.name(view, "View");
    b.deco(view, DECO_DESCRIPTOR_SET, &[0]);
    b.deco(view, DECO_BINDING, &[1]);

    let img_ty = b.ty_image(f32_ty, DIM_IMAGE_2D, IMG_SAMPLED);
    let sampled_img_ty = b.ty_sampled_image(img_ty);
    let arr_ty = b.ty_array(sampled_img_ty, 4);
    let textures = b.var(arr_ty, STORE_CLS_UNIFORM_CONSTANT);
    b.name(textures, "textures");
    b.deco(textures, DECO_DESCRIPTOR_SET, &[0]);
    b.deco(textures, DECO_BINDING, &[2]);

    push_block(&mut b, vec4_ty);

    let uv = input(&mut b, f32_ty, "uv", 0);
    let out_color = b.var(vec4_ty, STORE_CLS_OUTPUT);
    b.name(out_color, "out_color");
    b.deco(out_color, DECO_LOCATION, &[0]);
    b.entry_point(EXEC_MODEL_FRAGMENT, "main", &[uv, out_color]);
    b.build()
}

/// Compute shader with a storage image at set 0 binding 0 and a runtime-sized
/// storage buffer `Particles { vec4 pos[]; }` at set 2 binding 0.
pub fn comp_spv() -> Vec<u32> {
    let mut b = SpirvBuilder::new();
    let f32_ty = b.ty_float(32);
    let vec4_ty = b.ty_vec(f32_ty, 4);

    let img_ty = b.ty_image(f32_ty, DIM_IMAGE_2D, IMG_STORAGE);
    let target = b.var(img_ty, STORE_CLS_UNIFORM_CONSTANT);
    b.name(target, "target");
    b.deco(target, DECO_DESCRIPTOR_SET, &[0]);
    b.deco(target, DECO_BINDING, &[0]);

    let rta_ty = b.ty_runtime_array(vec4_ty);
    b.deco(rta_ty, DECO_ARRAY_STRIDE, &[16]);
    let particles_ty = b.ty_struct(&[rta_ty]);
    b.name(particles_ty, "Particles");
    b.member_name(particles_ty, 0, "pos");
    b.deco(particles_ty, DECO_BLOCK, &[]);
    b.member_deco(particles_ty, 0, DECO_OFFSET, &[0]);
    let particles = b.var(particles_ty, STORE_CLS_STORAGE_BUFFER);
    b.name(particles, "particles");
    b.deco(particles, DECO_DESCRIPTOR_SET, &[2]);
    b.deco(particles, DECO_BINDING, &[0]);

    b.entry_point(EXEC_MODEL_GL_COMPUTE, "main", &[]);
    b.build()
}

/// Install a test logger, tolerating repeated calls.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
