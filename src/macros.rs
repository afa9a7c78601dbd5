/// Creates a [`DynamicArray`](crate::DynamicArray), same as `vec!`.
///
/// ```
/// use dynarr::dyn_array;
///
/// let array = dyn_array![1, 2, 3];
/// assert_eq!(array, [1, 2, 3]);
/// assert_eq!(array.capacity(), 3);
///
/// let zeros = dyn_array![0u8; 4];
/// assert_eq!(zeros, [0, 0, 0, 0]);
/// ```
#[macro_export]
macro_rules! dyn_array {
    () => {
        $crate::DynamicArray::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::DynamicArray::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::DynamicArray::from([$($x),+])
    };
}
