use pretty_assertions::assert_eq;

use super::*;

#[test]
fn single_element_is_a_primitive() {
    let layout = NativeType::from_layout(&[ForeignPrimitive::SInt32]);
    assert_eq!(layout, Ok(NativeType::Primitive(ForeignPrimitive::SInt32)));
}

#[test]
fn empty_layout_is_rejected() {
    assert!(matches!(
        NativeType::from_layout(&[]),
        Err(RuntimeError::InvalidForeignDescriptor { .. })
    ));
}

#[test]
fn struct_offsets_follow_c_rules() {
    let Ok(NativeType::Aggregate(aggregate)) = NativeType::from_layout(&[
        ForeignPrimitive::UInt8,
        ForeignPrimitive::UInt32,
        ForeignPrimitive::UInt16,
    ]) else {
        panic!("expected an aggregate");
    };
    assert_eq!(aggregate.offsets(), &[0, 4, 8]);
    assert_eq!(aggregate.size(), 12);
    assert_eq!(aggregate.align(), 4);
}

#[test]
fn packed_struct_has_no_padding() {
    let layout =
        NativeType::from_layout(&[ForeignPrimitive::Float32, ForeignPrimitive::Float32]);
    let Ok(layout) = layout else {
        panic!("expected a layout");
    };
    assert_eq!(layout.size(), 8);
    assert_eq!(layout.to_string(), "struct {float, float}");
}

#[test]
fn pointer_matches_usize() {
    assert_eq!(ForeignPrimitive::Pointer.size(), std::mem::size_of::<usize>());
    assert_eq!(ForeignPrimitive::USIZE.size(), std::mem::size_of::<usize>());
    assert_eq!(ForeignPrimitive::ISIZE.size(), std::mem::size_of::<isize>());
}

#[test]
fn signature_display() {
    let signature = CallSignature {
        abi: Abi::Default,
        ret: NativeType::Void,
        args: smallvec::smallvec![NativeType::POINTER],
        fixed_args: Some(1),
    };
    assert_eq!(signature.to_string(), "default (pointer, ...) -> void");
}
