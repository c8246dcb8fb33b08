use std::collections::HashMap;
use std::collections::hash_map::Entry::Vacant;
use log::debug;
use super::consts::*;
use super::parse::Instr;
use super::{Error, Result, Stage};

pub type InstrId = u32;
type TypeId = InstrId;
type Decoration = u32;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NumericType {
    /// Byte-width of each scalar component.
    nbyte: u32,
    /// For integral types the field indicate it's signed ness, true for signed
    /// int and false for unsigned. Floating point number will have this field
    /// `None`.
    is_signed: Option<bool>,
    /// Row number for matrix types and element number for vector types.
    nrow: Option<u32>,
    /// Column number for matrix types.
    ncol: Option<u32>,
}
impl NumericType {
    pub fn int(nbyte: u32, is_signed: bool) -> NumericType {
        NumericType {
            nbyte: nbyte,
            is_signed: Some(is_signed),
            ..Default::default()
        }
    }
    pub fn float(nbyte: u32) -> NumericType {
        NumericType {
            nbyte: nbyte,
            ..Default::default()
        }
    }
    pub fn vec(elem_ty: &NumericType, nrow: u32) -> NumericType {
        NumericType {
            nbyte: elem_ty.nbyte,
            is_signed: elem_ty.is_signed,
            nrow: Some(nrow),
            ..Default::default()
        }
    }
    pub fn mat(col_ty: &NumericType, ncol: u32) -> NumericType {
        NumericType {
            nbyte: col_ty.nbyte,
            is_signed: col_ty.is_signed,
            nrow: col_ty.nrow,
            ncol: Some(ncol),
        }
    }

    pub fn nbyte(&self) -> u32 { self.nbyte }
    pub fn nrow(&self) -> u32 { self.nrow.unwrap_or(1) }
    pub fn ncol(&self) -> u32 { self.ncol.unwrap_or(1) }

    pub fn is_primitive(&self) -> bool { self.nrow.is_none() && self.ncol.is_none() }
    pub fn is_vec(&self) -> bool { self.nrow.is_some() && self.ncol.is_none() }
    pub fn is_mat(&self) -> bool { self.nrow.is_some() && self.ncol.is_some() }

    pub fn is_sint(&self) -> bool { Some(true) == self.is_signed }
    pub fn is_uint(&self) -> bool { Some(false) == self.is_signed }
    pub fn is_float(&self) -> bool { None == self.is_signed }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum MatrixLayout {
    ColumnMajor,
    RowMajor,
}
impl Default for MatrixLayout {
    fn default() -> MatrixLayout { MatrixLayout::ColumnMajor }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum DescriptorType {
    Sampler,
    CombinedImageSampler,
    SampledImage,
    StorageImage,
    UniformTexelBuffer,
    StorageTexelBuffer,
    UniformBuffer,
    StorageBuffer,
    InputAttachment,
}

/// A block or one of its members. `offset` is relative to the enclosing
/// struct, so top-level members carry their offset into the block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockVariable {
    pub name: String,
    pub offset: u32,
    /// Natural byte size of the variable.
    pub size: u32,
    /// Byte size up to the next member, or to the 16-byte aligned end of the
    /// enclosing struct for the last member.
    pub padded_size: u32,
    /// Only set for matrices and arrays of matrices.
    pub mat_layout: Option<MatrixLayout>,
    pub members: Vec<BlockVariable>,
}

#[derive(Debug, Clone)]
pub struct DescriptorBinding {
    pub set: u32,
    pub bind_point: u32,
    pub name: String,
    pub desc_ty: DescriptorType,
    /// Dimensions of a descriptor array, outermost first. Runtime arrays have
    /// a zero dimension.
    pub array_dims: Vec<u32>,
    /// Layout of uniform and storage buffers.
    pub block: Option<BlockVariable>,
    pub input_attm_idx: Option<u32>,
}
impl DescriptorBinding {
    /// Number of descriptors bound at this binding point.
    pub fn ndesc(&self) -> u32 { self.array_dims.iter().product() }
}

#[derive(Debug, Clone)]
pub struct InterfaceVariable {
    pub name: String,
    pub location: Option<u32>,
    pub is_built_in: bool,
    /// `None` for structs, arrays and other non-numeric types.
    pub num_ty: Option<NumericType>,
}

#[derive(Debug, Clone)]
pub struct EntryPoint {
    pub name: String,
    pub exec_model: u32,
    pub func: InstrId,
    interface: Vec<InstrId>,
}
impl EntryPoint {
    pub fn stage(&self) -> Option<Stage> { Stage::from_exec_model(self.exec_model) }
}

/// Resource interface of a single module.
#[derive(Debug, Clone, Default)]
pub struct ShaderReflection {
    entry_points: Vec<EntryPoint>,
    desc_binds: Vec<DescriptorBinding>,
    push_consts: Vec<BlockVariable>,
    inputs: Vec<InterfaceVariable>,
}
impl ShaderReflection {
    pub fn reflect(words: &[u32]) -> Result<ShaderReflection> {
        SpirvMetadata::new(words)?.inflate()
    }
    pub fn entry_points(&self) -> &[EntryPoint] { &self.entry_points }
    /// Stage of the first entry point, if it's one of the supported stages.
    pub fn stage(&self) -> Option<Stage> {
        self.entry_points.first().and_then(EntryPoint::stage)
    }
    /// Descriptor bindings ordered by set and binding point.
    pub fn desc_binds(&self) -> &[DescriptorBinding] { &self.desc_binds }
    pub fn push_const_blocks(&self) -> &[BlockVariable] { &self.push_consts }
    /// Stage inputs of the first entry point in declaration order.
    pub fn input_vars(&self) -> &[InterfaceVariable] { &self.inputs }
}


/// Offsets and sizes come straight from decorations, so any overflow means
/// the module is corrupted.
fn checked(x: Option<u32>) -> Result<u32> { x.ok_or(Error::CorruptedSpirv) }
fn round_up(x: u32, align: u32) -> Result<u32> {
    checked(x.checked_add(align - 1)).map(|x| x / align * align)
}

#[derive(Debug, Clone)]
enum Type {
    Numeric(NumericType),
    Bool,
    Image {
        dim: u32,
        sampled: u32,
    },
    Sampler,
    SampledImage,
    Array {
        elem_ty: TypeId,
        nelem: Option<u32>,
    },
    Struct(Vec<TypeId>),
    Pointer(TypeId),
}
#[derive(Debug, Clone)]
struct Variable {
    ty: TypeId,
    store_cls: u32,
}

#[derive(Default, Debug)]
struct SpirvMetadata<'a> {
    entry_points: Vec<EntryPoint>,
    name_map: HashMap<(InstrId, Option<u32>), String>,
    deco_map: HashMap<(InstrId, Option<u32>, Decoration), &'a [u32]>,
    ty_map: HashMap<TypeId, Type>,
    // Global variables in declaration order.
    vars: Vec<(InstrId, Variable)>,
    const_map: HashMap<InstrId, &'a [u32]>,
}
impl<'a> SpirvMetadata<'a> {
    fn new(words: &'a [u32]) -> Result<SpirvMetadata<'a>> {
        let mut meta = SpirvMetadata::default();
        for instr in super::instrs(words)? {
            let instr = instr?;
            let opcode = instr.opcode();
            if opcode == OP_ENTRY_POINT {
                meta.populate_entry_point(&instr)?;
            } else if NAME_RANGE.contains(&opcode) {
                meta.populate_name(&instr)?;
            } else if DECO_RANGE.contains(&opcode) {
                meta.populate_deco(&instr)?;
            } else if TYPE_RANGE.contains(&opcode) {
                meta.populate_one_ty(&instr)?;
            } else if CONST_RANGE.contains(&opcode) || SPEC_CONST_RANGE.contains(&opcode) {
                meta.populate_one_const(&instr)?;
            } else if opcode == OP_VARIABLE {
                meta.populate_one_var(&instr)?;
            } else if opcode == OP_FUNCTION {
                // Nothing interesting is declared in function bodies.
                break;
            }
        }
        Ok(meta)
    }
    fn populate_entry_point(&mut self, instr: &Instr<'a>) -> Result<()> {
        let mut operands = instr.operands();
        let exec_model = operands.read_u32()?;
        let func = operands.read_u32()?;
        let name = operands.read_str()?;
        let interface = operands.read_list()?.to_owned();
        self.entry_points.push(EntryPoint {
            name: name,
            exec_model: exec_model,
            func: func,
            interface: interface,
        });
        Ok(())
    }
    fn populate_name(&mut self, instr: &Instr<'a>) -> Result<()> {
        let mut operands = instr.operands();
        let target_id = operands.read_u32()?;
        let member_idx = if instr.opcode() == OP_MEMBER_NAME {
            Some(operands.read_u32()?)
        } else { None };
        let name = operands.read_str()?;
        // Names are debug information only; the last one wins.
        self.name_map.insert((target_id, member_idx), name);
        Ok(())
    }
    fn populate_deco(&mut self, instr: &Instr<'a>) -> Result<()> {
        let mut operands = instr.operands();
        let target_id = operands.read_u32()?;
        let member_idx = if instr.opcode() == OP_MEMBER_DECORATE {
            Some(operands.read_u32()?)
        } else { None };
        let deco = operands.read_u32()?;
        let params = operands.read_list()?;
        self.deco_map.entry((target_id, member_idx, deco)).or_insert(params);
        Ok(())
    }
    fn populate_one_ty(&mut self, instr: &Instr<'a>) -> Result<()> {
        let mut operands = instr.operands();
        let ty_id = operands.read_u32()?;
        let ty = match instr.opcode() {
            OP_TYPE_BOOL => Type::Bool,
            OP_TYPE_INT => {
                let nbit = operands.read_u32()?;
                let is_signed = operands.read_bool()?;
                Type::Numeric(NumericType::int(nbit >> 3, is_signed))
            },
            OP_TYPE_FLOAT => {
                let nbit = operands.read_u32()?;
                Type::Numeric(NumericType::float(nbit >> 3))
            },
            OP_TYPE_VECTOR => {
                let elem_ty_id = operands.read_u32()?;
                let nelem = operands.read_u32()?;
                match self.ty_map.get(&elem_ty_id) {
                    Some(Type::Numeric(num_ty)) => Type::Numeric(NumericType::vec(num_ty, nelem)),
                    Some(Type::Bool) => Type::Bool,
                    _ => return Err(Error::CorruptedSpirv),
                }
            },
            OP_TYPE_MATRIX => {
                let col_ty_id = operands.read_u32()?;
                let ncol = operands.read_u32()?;
                match self.ty_map.get(&col_ty_id) {
                    Some(Type::Numeric(col_ty)) if col_ty.is_vec() => {
                        Type::Numeric(NumericType::mat(col_ty, ncol))
                    },
                    _ => return Err(Error::CorruptedSpirv),
                }
            },
            OP_TYPE_IMAGE => {
                let _sampled_ty_id = operands.read_u32()?;
                let dim = operands.read_u32()?;
                let _is_depth = operands.read_u32()?;
                let _is_array = operands.read_bool()?;
                let _is_multisampled = operands.read_bool()?;
                let sampled = operands.read_u32()?;
                Type::Image { dim: dim, sampled: sampled }
            },
            OP_TYPE_SAMPLER => Type::Sampler,
            OP_TYPE_SAMPLED_IMAGE => Type::SampledImage,
            OP_TYPE_ARRAY => {
                let elem_ty = operands.read_u32()?;
                let nelem_const_id = operands.read_u32()?;
                let nelem = self.const_map.get(&nelem_const_id)
                    .and_then(|value| value.first())
                    .cloned()
                    // Lengths computed by `OpSpecConstantOp` are not
                    // evaluated.
                    .ok_or(Error::UnsupportedSpirv)?;
                Type::Array { elem_ty: elem_ty, nelem: Some(nelem) }
            },
            OP_TYPE_RUNTIME_ARRAY => {
                let elem_ty = operands.read_u32()?;
                Type::Array { elem_ty: elem_ty, nelem: None }
            },
            OP_TYPE_STRUCT => {
                let member_tys = operands.read_list()?;
                Type::Struct(member_tys.to_owned())
            },
            OP_TYPE_POINTER => {
                let _store_cls = operands.read_u32()?;
                let target_ty = operands.read_u32()?;
                Type::Pointer(target_ty)
            },
            // Void, function and opaque types never describe a resource.
            _ => return Ok(()),
        };
        if let Vacant(entry) = self.ty_map.entry(ty_id) {
            entry.insert(ty); Ok(())
        } else { Err(Error::CorruptedSpirv) }
    }
    fn populate_one_const(&mut self, instr: &Instr<'a>) -> Result<()> {
        match instr.opcode() {
            OP_CONSTANT | OP_SPEC_CONSTANT => {},
            // Only scalar constants can size an array.
            _ => return Ok(()),
        }
        let mut operands = instr.operands();
        let _ty_id = operands.read_u32()?;
        let const_id = operands.read_u32()?;
        let value = operands.read_list()?;
        if let Vacant(entry) = self.const_map.entry(const_id) {
            entry.insert(value); Ok(())
        } else { Err(Error::CorruptedSpirv) }
    }
    fn populate_one_var(&mut self, instr: &Instr<'a>) -> Result<()> {
        let mut operands = instr.operands();
        let ty_id = operands.read_u32()?;
        let var_id = operands.read_u32()?;
        let store_cls = operands.read_u32()?;
        self.vars.push((var_id, Variable { ty: ty_id, store_cls: store_cls }));
        Ok(())
    }

    fn get_deco(&self, id: InstrId, member_idx: Option<u32>, deco: Decoration) -> Option<&[u32]> {
        self.deco_map.get(&(id, member_idx, deco))
            .cloned()
    }
    fn get_deco_u32(&self, id: InstrId, member_idx: Option<u32>, deco: Decoration) -> Option<u32> {
        self.deco_map.get(&(id, member_idx, deco))
            .and_then(|x| x.get(0))
            .cloned()
    }
    fn get_name(&self, id: InstrId, member_idx: Option<u32>) -> Option<&str> {
        self.name_map.get(&(id, member_idx))
            .map(|x| x.as_str())
            .filter(|x| !x.is_empty())
    }
    /// Resolve recurring layers of pointers to the type that describes the
    /// data directly. `None` if the type is not modeled.
    fn resolve_ref(&self, ty_id: TypeId) -> Option<(TypeId, &Type)> {
        let ty = self.ty_map.get(&ty_id)?;
        if let Type::Pointer(ref_ty) = ty {
            self.resolve_ref(*ref_ty)
        } else { Some((ty_id, ty)) }
    }
    /// Peel off array layers and collect their dimensions.
    fn resolve_arr<'b>(&'b self, mut ty_id: TypeId, mut ty: &'b Type) -> Option<(TypeId, &'b Type, Vec<u32>)> {
        let mut dims = Vec::new();
        while let Type::Array { elem_ty, nelem } = ty {
            dims.push(nelem.unwrap_or(0));
            let (elem_ty_id, elem_ty) = self.resolve_ref(*elem_ty)?;
            ty_id = elem_ty_id;
            ty = elem_ty;
        }
        Some((ty_id, ty, dims))
    }

    fn ty2var(
        &self,
        ty_id: TypeId,
        name: &str,
        offset: u32,
        mat_stride: Option<u32>,
        mat_layout: MatrixLayout,
    ) -> Result<BlockVariable> {
        let ty = self.ty_map.get(&ty_id)
            .ok_or(Error::CorruptedSpirv)?;
        let (size, members, mat_layout) = match ty {
            Type::Numeric(num_ty) if num_ty.is_mat() => {
                let nvec = match mat_layout {
                    MatrixLayout::ColumnMajor => num_ty.ncol(),
                    MatrixLayout::RowMajor => num_ty.nrow(),
                };
                let vec_nbyte = match mat_layout {
                    MatrixLayout::ColumnMajor => num_ty.nrow().checked_mul(num_ty.nbyte()),
                    MatrixLayout::RowMajor => num_ty.ncol().checked_mul(num_ty.nbyte()),
                };
                let stride = match mat_stride {
                    Some(x) => x,
                    None => checked(vec_nbyte)?,
                };
                (checked(stride.checked_mul(nvec))?, Vec::new(), Some(mat_layout))
            },
            Type::Numeric(num_ty) => {
                (checked(num_ty.nrow().checked_mul(num_ty.nbyte()))?, Vec::new(), None)
            },
            // Booleans have no physical size but take a 32-bit slot in
            // GLSL-compiled blocks.
            Type::Bool => (4, Vec::new(), None),
            // 64-bit physical storage buffer address.
            Type::Pointer(_) => (8, Vec::new(), None),
            Type::Array { elem_ty, nelem } => {
                let elem = self.ty2var(*elem_ty, "", 0, mat_stride, mat_layout)?;
                let stride = self.get_deco_u32(ty_id, None, DECO_ARRAY_STRIDE)
                    .unwrap_or(elem.size);
                let size = checked(nelem.unwrap_or(0).checked_mul(stride))?;
                (size, elem.members, elem.mat_layout)
            },
            Type::Struct(member_tys) => {
                let members = self.struct2members(ty_id, member_tys)?;
                let size = match members.last() {
                    Some(x) => checked(x.offset.checked_add(x.size))?,
                    None => 0,
                };
                (size, members, None)
            },
            _ => return Err(Error::UnsupportedSpirv),
        };
        let var = BlockVariable {
            name: name.to_owned(),
            offset: offset,
            size: size,
            padded_size: size,
            mat_layout: mat_layout,
            members: members,
        };
        Ok(var)
    }
    fn struct2members(&self, ty_id: TypeId, member_tys: &[TypeId]) -> Result<Vec<BlockVariable>> {
        let mut members: Vec<BlockVariable> = Vec::with_capacity(member_tys.len());
        for (i, &member_ty) in member_tys.iter().enumerate() {
            let i = i as u32;
            // Members of interface blocks may come without explicit layout.
            let offset = match self.get_deco_u32(ty_id, Some(i), DECO_OFFSET) {
                Some(x) => x,
                None => match members.last() {
                    Some(x) => checked(x.offset.checked_add(x.size))?,
                    None => 0,
                },
            };
            let mat_stride = self.get_deco_u32(ty_id, Some(i), DECO_MATRIX_STRIDE);
            let mat_layout = if self.get_deco(ty_id, Some(i), DECO_ROW_MAJOR).is_some() {
                MatrixLayout::RowMajor
            } else { MatrixLayout::ColumnMajor };
            let name = self.get_name(ty_id, Some(i)).unwrap_or("");
            members.push(self.ty2var(member_ty, name, offset, mat_stride, mat_layout)?);
        }
        let n = members.len();
        for i in 0..n {
            let end = if i + 1 < n {
                members[i + 1].offset
            } else {
                round_up(checked(members[i].offset.checked_add(members[i].size))?, 16)?
            };
            members[i].padded_size = end.saturating_sub(members[i].offset);
        }
        Ok(members)
    }
    /// Block of a buffer variable, named after the variable and falling back
    /// to the struct type name for anonymous instances.
    fn block_var(&self, var_id: InstrId, ty_id: TypeId) -> Result<BlockVariable> {
        let name = self.get_name(var_id, None)
            .or_else(|| self.get_name(ty_id, None))
            .unwrap_or("");
        let mut block = self.ty2var(ty_id, name, 0, None, MatrixLayout::ColumnMajor)?;
        block.size = round_up(block.size, 16)?;
        block.padded_size = block.size;
        Ok(block)
    }

    fn inflate_desc_bind(&self, var_id: InstrId, var: &Variable) -> Result<Option<DescriptorBinding>> {
        let bind_point = match self.get_deco_u32(var_id, None, DECO_BINDING) {
            Some(x) => x,
            None => {
                debug!("resource variable {} has no binding point, ignored", var_id);
                return Ok(None);
            },
        };
        let set = self.get_deco_u32(var_id, None, DECO_DESCRIPTOR_SET)
            .unwrap_or(0);
        let (ty_id, ty, array_dims) = match self.resolve_ref(var.ty)
            .and_then(|(ty_id, ty)| self.resolve_arr(ty_id, ty)) {
            Some(x) => x,
            None => {
                debug!("resource variable {} is of unknown type, ignored", var_id);
                return Ok(None);
            },
        };
        let desc_ty = match (var.store_cls, ty) {
            (STORE_CLS_UNIFORM_CONSTANT, Type::Sampler) => DescriptorType::Sampler,
            (STORE_CLS_UNIFORM_CONSTANT, Type::SampledImage) => DescriptorType::CombinedImageSampler,
            (STORE_CLS_UNIFORM_CONSTANT, Type::Image { dim, sampled }) => {
                match (*dim, *sampled) {
                    (DIM_IMAGE_BUFFER, IMG_STORAGE) => DescriptorType::StorageTexelBuffer,
                    (DIM_IMAGE_BUFFER, _) => DescriptorType::UniformTexelBuffer,
                    (DIM_IMAGE_SUBPASS_DATA, _) => DescriptorType::InputAttachment,
                    (_, IMG_STORAGE) => DescriptorType::StorageImage,
                    _ => DescriptorType::SampledImage,
                }
            },
            (STORE_CLS_UNIFORM, Type::Struct(_)) => {
                if self.get_deco(ty_id, None, DECO_BUFFER_BLOCK).is_some() {
                    DescriptorType::StorageBuffer
                } else {
                    DescriptorType::UniformBuffer
                }
            },
            (STORE_CLS_STORAGE_BUFFER, Type::Struct(_)) => DescriptorType::StorageBuffer,
            _ => {
                debug!("resource variable {} is not a descriptor, ignored", var_id);
                return Ok(None);
            },
        };
        let block = match desc_ty {
            DescriptorType::UniformBuffer | DescriptorType::StorageBuffer => {
                Some(self.block_var(var_id, ty_id)?)
            },
            _ => None,
        };
        let desc_bind = DescriptorBinding {
            set: set,
            bind_point: bind_point,
            name: self.get_name(var_id, None).unwrap_or("").to_owned(),
            desc_ty: desc_ty,
            array_dims: array_dims,
            block: block,
            input_attm_idx: self.get_deco_u32(var_id, None, DECO_INPUT_ATTACHMENT_INDEX),
        };
        Ok(Some(desc_bind))
    }
    fn inflate_push_const(&self, var_id: InstrId, var: &Variable) -> Result<Option<BlockVariable>> {
        let ty_id = match self.resolve_ref(var.ty) {
            Some((ty_id, Type::Struct(_))) => ty_id,
            _ => return Err(Error::CorruptedSpirv),
        };
        let mut block = self.block_var(var_id, ty_id)?;
        // Push constant blocks have no binding. Their range starts at the
        // first member actually laid out.
        let offset = block.members.iter()
            .map(|x| x.offset)
            .min()
            .unwrap_or(0);
        block.offset = offset;
        block.size = block.size.saturating_sub(offset);
        block.padded_size = block.size;
        Ok(Some(block))
    }
    fn inflate_input(&self, var_id: InstrId, var: &Variable) -> InterfaceVariable {
        let resolved = self.resolve_ref(var.ty);
        let mut is_built_in = self.get_deco(var_id, None, DECO_BUILT_IN).is_some();
        // Built-in blocks like `gl_PerVertex` decorate their members instead.
        if let Some((ty_id, Type::Struct(members))) = resolved
            .and_then(|(ty_id, ty)| self.resolve_arr(ty_id, ty))
            .map(|(ty_id, ty, _)| (ty_id, ty)) {
            is_built_in |= (0..members.len() as u32)
                .any(|i| self.get_deco(ty_id, Some(i), DECO_BUILT_IN).is_some());
        }
        let num_ty = match resolved {
            Some((_, Type::Numeric(num_ty))) => Some(num_ty.clone()),
            _ => None,
        };
        InterfaceVariable {
            name: self.get_name(var_id, None).unwrap_or("").to_owned(),
            location: self.get_deco_u32(var_id, None, DECO_LOCATION),
            is_built_in: is_built_in,
            num_ty: num_ty,
        }
    }

    fn inflate(self) -> Result<ShaderReflection> {
        let mut desc_binds = Vec::new();
        let mut push_consts = Vec::new();
        for (var_id, var) in self.vars.iter() {
            match var.store_cls {
                STORE_CLS_UNIFORM_CONSTANT | STORE_CLS_UNIFORM | STORE_CLS_STORAGE_BUFFER => {
                    if let Some(desc_bind) = self.inflate_desc_bind(*var_id, var)? {
                        desc_binds.push(desc_bind);
                    }
                },
                STORE_CLS_PUSH_CONSTANT => {
                    if let Some(block) = self.inflate_push_const(*var_id, var)? {
                        push_consts.push(block);
                    }
                },
                _ => {},
            }
        }
        desc_binds.sort_by_key(|x| (x.set, x.bind_point));

        let mut inputs = Vec::new();
        if let Some(entry_point) = self.entry_points.first() {
            let var_map = self.vars.iter()
                .map(|(id, var)| (*id, var))
                .collect::<HashMap<_, _>>();
            for var_id in entry_point.interface.iter() {
                // Since SPIR-V 1.4 the interface lists every global variable.
                match var_map.get(var_id) {
                    Some(var) if var.store_cls == STORE_CLS_INPUT => {
                        inputs.push(self.inflate_input(*var_id, var));
                    },
                    Some(_) => {},
                    None => return Err(Error::CorruptedSpirv),
                }
            }
        }

        let refl = ShaderReflection {
            entry_points: self.entry_points,
            desc_binds: desc_binds,
            push_consts: push_consts,
            inputs: inputs,
        };
        Ok(refl)
    }
}
